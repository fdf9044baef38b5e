//! Built-in plugins.
//!
//! There is no discovery: applications register the plugins they want, and [`builtin`] is the
//! default manifest.

use crate::opts::Opts;
use crate::plugin::Plugin;

mod joke;
mod life;
mod unclear;

pub use joke::Joke;
pub use life::Life;
pub use unclear::Unclear;

/// The plugins shipped with the crate, in registration order.
pub fn builtin(opts: &Opts) -> Vec<Box<dyn Plugin>> {
    vec![
        Box::new(Joke::new(opts.listen.active_timeout())),
        Box::new(Life::new()),
        Box::new(Unclear::new()),
    ]
}
