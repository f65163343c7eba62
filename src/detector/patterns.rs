//! 拦截页特征库 (Pattern Registry)
//!
//! 两张按声明顺序扫描的特征表，首个命中即返回。表在首次访问时编译，之后只读。

use std::sync::OnceLock;

use regex::Regex;

use crate::core::model::Tier;

/// 单条特征：正则 + 描述标签
#[derive(Debug)]
pub struct Signature {
    pub tier: Tier,
    pub label: &'static str,
    pub pattern: Regex,
}

impl Signature {
    fn compile(tier: Tier, pattern: &str, label: &'static str) -> Self {
        Self {
            tier,
            label,
            pattern: Regex::new(pattern).expect("signature regex must compile"),
        }
    }

    pub fn is_match(&self, snippet: &str) -> bool {
        self.pattern.is_match(snippet)
    }
}

/// 高置信结构性标记：几乎只出现在拦截/挑战页中
const HIGH_CONFIDENCE_SOURCES: &[(&str, &str)] = &[
    // Akamai: Reference #18.2d351ab8.1557333295.a4e16ab
    (
        r"(?i)Reference\s*#\s*\d+\.[0-9a-f]+\.\d+\.[0-9a-f]+",
        "Akamai block (Reference #)",
    ),
    (
        r"(?i)Pardon\s+Our\s+Interruption",
        "Akamai challenge (Pardon Our Interruption)",
    ),
    // 挑战表单常跨行
    (
        r"(?is)challenge-form.*?__cf_chl_f_tk=",
        "Cloudflare challenge form",
    ),
    // 1020 / 1010 / 1012 / 1015
    (
        r#"(?i)<span\s+class="cf-error-code">\d{4}</span>"#,
        "Cloudflare firewall block",
    ),
    (
        r"(?i)/cdn-cgi/challenge-platform/\S+orchestrate",
        "Cloudflare JS challenge",
    ),
    // 赋值语句，而非正文提及
    (r"(?i)window\._pxAppId\s*=", "PerimeterX block"),
    (r"(?i)captcha\.px-cdn\.net", "PerimeterX captcha"),
    (r"(?i)captcha-delivery\.com", "DataDome captcha"),
    (r"(?i)_Incapsula_Resource", "Imperva/Incapsula block"),
    (r"(?i)Incapsula\s+incident\s+ID", "Imperva/Incapsula incident"),
    (r"(?i)Sucuri\s+WebSite\s+Firewall", "Sucuri firewall block"),
    (
        r"(?i)KPSDK\.scriptStart\s*=\s*KPSDK\.now\(\)",
        "Kasada challenge",
    ),
];

/// 通用拦截措辞：正文、登录表单、安全博客中同样常见，需佐证
const CORROBORATED_SOURCES: &[(&str, &str)] = &[
    (r"(?i)Access\s+Denied", "Access Denied on short page"),
    (r"(?i)Checking\s+your\s+browser", "Cloudflare browser check"),
    (r"(?i)<title>\s*Just\s+a\s+moment", "Cloudflare interstitial"),
    (r#"(?i)class=["']g-recaptcha["']"#, "reCAPTCHA on block page"),
    (r#"(?i)class=["']h-captcha["']"#, "hCaptcha on block page"),
    (
        r"(?i)Access\s+to\s+This\s+Page\s+Has\s+Been\s+Blocked",
        "PerimeterX block page",
    ),
    (r"(?i)blocked\s+by\s+security", "Blocked by security"),
    (r"(?i)Request\s+unsuccessful", "Request unsuccessful (Imperva)"),
];

static HIGH_CONFIDENCE: OnceLock<Vec<Signature>> = OnceLock::new();
static CORROBORATED: OnceLock<Vec<Signature>> = OnceLock::new();

fn build(tier: Tier, sources: &[(&str, &'static str)]) -> Vec<Signature> {
    sources
        .iter()
        .map(|&(pattern, label)| Signature::compile(tier, pattern, label))
        .collect()
}

/// 高置信特征表
pub fn high_confidence() -> &'static [Signature] {
    HIGH_CONFIDENCE.get_or_init(|| build(Tier::HighConfidence, HIGH_CONFIDENCE_SOURCES))
}

/// 需佐证特征表
pub fn corroborated() -> &'static [Signature] {
    CORROBORATED.get_or_init(|| build(Tier::Corroborated, CORROBORATED_SOURCES))
}

/// 按层级取特征表
pub fn signatures(tier: Tier) -> &'static [Signature] {
    match tier {
        Tier::HighConfidence => high_confidence(),
        Tier::Corroborated => corroborated(),
    }
}

/// 按声明顺序扫描，返回首个命中
pub fn first_match<'a>(signatures: &'a [Signature], snippet: &str) -> Option<&'a Signature> {
    if snippet.is_empty() {
        return None;
    }
    signatures.iter().find(|sig| sig.is_match(snippet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_table_compiles_with_its_tier() {
        for tier in Tier::iter() {
            let table = signatures(tier);
            assert!(!table.is_empty());
            assert!(table.iter().all(|sig| sig.tier == tier));
        }
        assert_eq!(high_confidence().len(), 12);
        assert_eq!(corroborated().len(), 8);
    }

    #[test]
    fn registration_order_breaks_ties() {
        // 同时命中 Reference # 与 Pardon Our Interruption，先注册者胜出
        let page = "Pardon Our Interruption ... Reference #18.2d351ab8.1557333295.a4e16ab";
        let hit = first_match(high_confidence(), page).unwrap();
        assert_eq!(hit.label, "Akamai block (Reference #)");

        let generic = "Checking your browser. Access Denied.";
        let hit = first_match(corroborated(), generic).unwrap();
        assert_eq!(hit.label, "Access Denied on short page");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let hit = first_match(high_confidence(), "SUCURI website FIREWALL").unwrap();
        assert_eq!(hit.label, "Sucuri firewall block");
    }

    #[test]
    fn challenge_form_matches_across_lines() {
        let page = "<form id=\"challenge-form\"\n action=\"/x\">\n<input value=\"?__cf_chl_f_tk=abc\">";
        let hit = first_match(high_confidence(), page).unwrap();
        assert_eq!(hit.label, "Cloudflare challenge form");
    }

    #[test]
    fn prose_mentions_do_not_match_structural_markers() {
        let prose = "Vendors such as DataDome, PerimeterX and Kasada protect sites from bots.";
        assert!(first_match(high_confidence(), prose).is_none());
        assert!(first_match(high_confidence(), "").is_none());
    }

    #[test]
    fn widget_classes_accept_either_quote_style() {
        assert!(first_match(corroborated(), "<div class='g-recaptcha'></div>").is_some());
        assert!(first_match(corroborated(), "<div class=\"h-captcha\"></div>").is_some());
        assert!(first_match(corroborated(), "<div class=\"g-recaptcha-badge\"></div>").is_none());
    }
}
