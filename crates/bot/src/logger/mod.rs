use std::fmt;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local};
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "trading_bot";

/// CLI `--log-level` 값
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// EnvFilter 지시문. DEBUG/INFO 에서는 HTTP 스택 내부 로그를 warn으로 묶는다.
    pub fn directives(&self) -> String {
        match self {
            LogLevel::Debug => "debug,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn".into(),
            LogLevel::Info => "info,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn".into(),
            LogLevel::Warning => "warn".into(),
            LogLevel::Error => "error".into(),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        };
        f.write_str(name)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            other => Err(format!(
                "invalid log level '{}', expected one of DEBUG, INFO, WARNING, ERROR",
                other
            )),
        }
    }
}

/// `<timestamp> - <component> - <level> - <message>` 한 줄 포맷
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        write!(
            writer,
            "{} - {} - {} - ",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            meta.target(),
            meta.level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Tracing guards를 보관하는 구조체
/// 이 구조체가 drop되기 전까지 로깅이 계속 작동합니다
pub struct TracingGuards {
    _file: tracing_appender::non_blocking::WorkerGuard,
    _stdout: tracing_appender::non_blocking::WorkerGuard,
    log_file: PathBuf,
}

impl TracingGuards {
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
}

/// Tracing 초기화
/// 콘솔과 실행별 로그 파일에 같은 포맷으로 기록한다.
/// 콘솔은 `RUST_LOG`가 있으면 그 값을 우선한다.
pub fn init_tracing(level: LogLevel, log_dir: &Path) -> io::Result<TracingGuards> {
    let (file_writer, file_guard, log_file) = run_file_appender(log_dir, LOG_FILE_PREFIX)?;
    let (stdout_writer, stdout_guard) = non_blocking(io::stdout());

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.directives()));
    let file_filter = EnvFilter::new(level.directives());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer)
                .event_format(LineFormat)
                .with_filter(file_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(stdout_writer)
                .event_format(LineFormat)
                .with_filter(console_filter),
        )
        .init();

    Ok(TracingGuards {
        _file: file_guard,
        _stdout: stdout_guard,
        log_file,
    })
}

/// `trading_bot_20251129_143005.log` 형식
pub fn log_file_name(prefix: &str, started_at: DateTime<Local>) -> String {
    format!("{}_{}.log", prefix, started_at.format("%Y%m%d_%H%M%S"))
}

/// 실행마다 새 로그 파일 생성
fn run_file_appender(
    base_dir: &Path,
    prefix: &str,
) -> io::Result<(
    non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
    PathBuf,
)> {
    fs::create_dir_all(base_dir)?;

    let path = base_dir.join(log_file_name(prefix, Local::now()));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let (writer, guard) = non_blocking(file);
    Ok((writer, guard, path))
}
