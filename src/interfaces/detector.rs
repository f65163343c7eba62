use crate::core::model::{FetchOutcome, Verdict};

/// 拦截检测接口
///
/// - 检测器负责：根据单次抓取结果给出是否被拦截的结论与原因。
/// - 检测器不负责：重试、退避、切换代理等后续处置，这些由调用方决定。
pub trait BlockDetector: Send + Sync + std::fmt::Debug {
    /// 检测器名称 (用于调试/日志)
    fn name(&self) -> &str;

    /// 检查抓取结果
    fn inspect(&self, outcome: &FetchOutcome) -> Verdict;
}
