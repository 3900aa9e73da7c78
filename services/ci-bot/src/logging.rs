//! Logging setup shared by the binaries.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install a global subscriber writing to stderr.
///
/// Stdout belongs to the pipeline (mask directives, `KEY=value` lines), so
/// nothing log-shaped may end up there.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
