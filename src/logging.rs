use chrono::Local;
use env_logger::{Builder, Env, Target};
use std::error::Error;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

fn builder(default_filter: &str) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} {}: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });
    builder
}

/// Routes log output to `path`; the terminal belongs to the board while
/// playing.
pub fn init_file_logger(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    builder("info")
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

/// For the non-interactive word list commands.
pub fn init_stderr_logger() -> Result<(), Box<dyn Error>> {
    builder("warn").target(Target::Stderr).try_init()?;
    Ok(())
}
