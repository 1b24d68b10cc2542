use log4rs::{
    self,
    append::{ console::{ ConsoleAppender, Target }, rolling_file::{ policy::compound::{ roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy, }, RollingFileAppender, }, },
    config::{ Appender, Root },
    encode::pattern::PatternEncoder
};

use crate::config::logging::Logging;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l}):5} {t} {T} - {m}{n}";
const FILE_NAME: &str = "glare-detector.log";

pub fn init() {
    let log_cnf = match generate_config(&crate::CONFIG.logging) {
        Ok(c) => c,
        Err(e) => panic!("building logging config failed. {e}"),
    };
    if let Err(e) = log4rs::init_config(log_cnf) {
        panic!("initializing logger failed. {e}");
    }
    log_panics::init();
}

fn generate_config(logging: &Logging) -> Result<log4rs::Config> {
    let size = logging.size.checked_mul(1024 * 1024).unwrap_or(u64::MAX);

    let console_appender = ConsoleAppender::builder()
        .target(Target::Stdout)
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();

    let roller = FixedWindowRoller::builder()
        .build(&path_string(logging, "glare-detector.{}.log")?, logging.count)?;

    let rolling_file_appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(
            path_string(logging, FILE_NAME)?,
            Box::new(CompoundPolicy::new(Box::new(SizeTrigger::new(size)), Box::new(roller))),
        )?;

    let log_cnf = log4rs::Config::builder()
        .appender(Appender::builder().build("rolling_file_appender", Box::new(rolling_file_appender)))
        .appender(Appender::builder().build("console_appender", Box::new(console_appender)))
        .build(
            Root::builder()
                .appender("rolling_file_appender")
                .appender("console_appender")
                .build(logging.level),
        )?;

    Ok(log_cnf)
}

fn path_string(logging: &Logging, file: &str) -> Result<String> {
    let path = logging.path.join(file);
    match path.to_str() {
        Some(s) => Ok(s.to_string()),
        None => Err(format!("log path is not valid utf-8. {path:?}").into()),
    }
}
