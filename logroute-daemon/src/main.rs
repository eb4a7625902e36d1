use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tokio::signal::unix::{SignalKind, signal};

use logroute_core::error::{LogrouteError, SettingsError};
use logroute_core::metrics::{CONF_DEFAULT_FALLBACKS_TOTAL, DAEMON_UPTIME_SECONDS};
use logroute_core::settings::Settings;
use logroute_daemon::cli::DaemonCli;
use logroute_daemon::lock::ProcessLock;
use logroute_daemon::logging;
use logroute_routing::{ConfLoader, RoutingTable, SharedTable};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();

    // 설정 로드: 파일이 없으면 기본값 + 환경변수로 동작
    let mut settings = match Settings::load(&cli.config).await {
        Ok(settings) => settings,
        Err(LogrouteError::Settings(SettingsError::FileNotFound { path })) => {
            eprintln!("settings file {path} not found, using defaults");
            let mut settings = Settings::default();
            settings.apply_env_overrides();
            settings
        }
        Err(e) => return Err(anyhow::anyhow!("failed to load settings: {e}")),
    };

    // CLI 인자가 최우선
    if let Some(log_level) = cli.log_level {
        settings.general.log_level = log_level;
    }
    if let Some(log_format) = cli.log_format {
        settings.general.log_format = log_format;
    }
    if let Some(pid_file) = cli.pid_file {
        settings.general.pid_file = pid_file;
    }
    if let Some(conf_file) = cli.conf_file {
        settings.routing.conf_file = conf_file;
    }
    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid settings: {e}"))?;

    logging::init_tracing(&settings.general)?;
    logroute_core::metrics::describe_all();

    let conf_file = settings.routing.conf_file.clone();

    // 검증 모드: 라우팅 설정만 점검하고 종료
    if cli.validate {
        let table = ConfLoader::load_file(&conf_file)
            .await
            .map_err(|e| anyhow::anyhow!("configuration invalid: {e}"))?;
        tracing::info!(
            conf_file,
            outputs = table.outputs().len(),
            contexts = table.context_count(),
            rules = table.rule_count(),
            "configuration is valid"
        );
        return Ok(());
    }

    // 프로세스 중복 실행 방지
    let lock = if settings.general.pid_file.is_empty() {
        None
    } else {
        Some(
            ProcessLock::acquire(Path::new(&settings.general.pid_file))
                .map_err(|e| anyhow::anyhow!("failed to acquire process lock: {e}"))?,
        )
    };

    // 최초 로드: 실패하면 내장 기본 테이블로 폴백
    let table = match ConfLoader::load_file(&conf_file).await {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!(
                conf_file,
                error = %e,
                "initial configuration load failed, falling back to default table"
            );
            metrics::counter!(CONF_DEFAULT_FALLBACKS_TOTAL).increment(1);
            RoutingTable::default_table()
        }
    };
    let shared = Arc::new(SharedTable::new(table));

    let started = Instant::now();
    tracing::info!(conf_file, "logroute-daemon running");

    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut uptime_tick = tokio::time::interval(std::time::Duration::from_secs(60));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = sigterm.recv() => break,
            _ = sighup.recv() => {
                tracing::info!(conf_file, "reload signal received");
                match ConfLoader::load_file(&conf_file).await {
                    Ok(table) => {
                        shared.publish(table);
                        tracing::info!("routing table reloaded");
                    }
                    Err(e) => {
                        // 실패한 로드는 현재 테이블을 건드리지 않음
                        tracing::error!(error = %e, "reload failed, keeping current table");
                    }
                }
            }
            _ = uptime_tick.tick() => {
                metrics::gauge!(DAEMON_UPTIME_SECONDS).set(started.elapsed().as_secs_f64());
            }
        }
    }

    tracing::info!("shutdown signal received");
    if let Some(lock) = lock {
        lock.release();
    }
    tracing::info!("logroute-daemon shut down");
    Ok(())
}
