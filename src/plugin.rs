use crate::mic::Mic;

/// A skill the brain can dispatch recognized text to.
///
/// Plugins are registered explicitly with [`Brain::add_plugin`](crate::brain::Brain::add_plugin)
/// and are immutable afterwards. `handle` returns `anyhow::Result` because skills talk to
/// arbitrary third-party services; the conversation loop turns failures into a spoken
/// apology.
pub trait Plugin: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Words and phrases this plugin wants the recognizer to know about.
    fn phrases(&self) -> Vec<String>;

    /// Higher priorities are asked first; equal priorities keep registration order.
    fn priority(&self) -> i32 {
        0
    }

    /// Whether this plugin wants to handle `text`.
    fn is_valid(&self, text: &str) -> bool;

    /// Respond to `text`, speaking and listening through `mic`.
    fn handle(&self, text: &str, mic: &mut dyn Mic) -> anyhow::Result<()>;
}
