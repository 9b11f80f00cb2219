//! Conversion Notifier Port - 转换事件通知抽象
//!
//! 编排器通过该端口广播转换生命周期事件，
//! 不依赖具体推送通道，测试时可注入记录用实现

/// Conversion Notifier Port
///
/// 即发即弃的广播，无投递保证，不等待确认
pub trait ConversionNotifierPort: Send + Sync {
    /// 转换开始（在提取之前触发）
    fn conversion_started(&self);

    /// 转换完成（仅在音频成功落盘之后触发）
    fn conversion_completed(&self);
}
