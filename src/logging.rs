use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Installs the global tracing subscriber. Diagnostics go to stderr so
/// they never interleave with command output on stdout.
pub(crate) fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}
