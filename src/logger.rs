use simplelog::{Config, ConfigBuilder, LevelFilter, SimpleLogger};

/// Install the global logger. Verbose runs log at `Info`, everything else only
/// surfaces warnings (degraded extractions, failed catalog calls).
pub fn init(verbose: bool) {
    let level = if verbose { LevelFilter::Info } else { LevelFilter::Warn };
    let config = if verbose {
        Config::default()
    } else {
        ConfigBuilder::new().set_time_level(LevelFilter::Off).build()
    };
    let _ = SimpleLogger::init(level, config);
}
