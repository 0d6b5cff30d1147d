use chrono::{Datelike, Local};
use clap::Parser;
use ppe_gate::{attendance_log, catalog, cli, config, error, export, terminal};
use attendance_log::AttendanceLog;
use catalog::{code, Catalog};
use cli::{Cli, CodeAction, Commands, LogAction, WorkersAction};
use config::Config;
use error::{GateError, Result};
use ppe_gate_common::{attendance_rows, AttendanceRecorder};
use std::path::PathBuf;
use terminal::{Terminal, TerminalAction};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "ppe_gate=debug,ppe_gate_common=debug"
    } else {
        "ppe_gate=info,ppe_gate_common=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    let catalog_path = cli.catalog.clone().or_else(|| config.catalog_path());
    debug!(catalog = ?catalog_path, "resolved catalog path");

    match cli.command {
        Commands::Scan => {
            println!("🦺 ppe-gate - スキャン端末\n");
            let mut terminal = open_terminal(&config, catalog_path)?;
            terminal::run_interactive(&mut terminal)?;
        }

        Commands::Check { codes, mark } => {
            let mut terminal = open_terminal(&config, catalog_path)?;
            for code in codes {
                let outcome = terminal.handle(TerminalAction::Scan(code))?;
                println!("{}\n", outcome);
            }
            if mark {
                let outcome = terminal.handle(TerminalAction::Mark)?;
                println!("{}", outcome);
            }
        }

        Commands::Workers { action } => {
            let mut catalog = Catalog::load_or_sample(catalog_path.as_deref())?;

            match action {
                WorkersAction::List => print_workers(&catalog),

                WorkersAction::Add { name, equipment, year } => {
                    let year = year.unwrap_or_else(|| Local::now().year() as u32);
                    let worker = catalog.add_worker(&name, &equipment, year)?;
                    println!("✔ 作業員を追加しました: {} (ID {})", worker.name, worker.id);
                    for (t, id) in &worker.equipment_items {
                        println!("  {:<10} {}", t.as_str(), id);
                    }
                    save_catalog(&catalog, catalog_path, &mut config)?;
                }

                WorkersAction::Remove { id } => {
                    if !catalog.remove_worker(id) {
                        return Err(GateError::WorkerNotFound(id));
                    }
                    println!("✔ 作業員を削除しました: ID {}", id);
                    save_catalog(&catalog, catalog_path, &mut config)?;
                }
            }
        }

        Commands::Log { action: LogAction::Show } => {
            let log_path = config.attendance_log_path()?;
            let log = AttendanceLog::load(&log_path)?;

            if log.is_empty() {
                println!("出勤記録はありません: {}", log_path.display());
                return Ok(());
            }

            println!("出勤ログ ({}件): {}", log.len(), log_path.display());
            for row in attendance_rows(log.records(), &Local) {
                println!(
                    "  {:>3}. {:<20} {} {} {}",
                    row.no, row.worker_name, row.date, row.time, row.status
                );
            }
        }

        Commands::Export { output } => {
            println!("📄 ppe-gate - 出勤簿エクスポート\n");

            let log_path = config.attendance_log_path()?;
            let log = AttendanceLog::load(&log_path)?;
            println!("- 出勤記録: {}件", log.len());

            let target = output.unwrap_or_else(|| config.export_dir());
            let output_path = export::output_path(&target, Local::now().date_naive());
            export::excel::generate_excel(&log, &output_path)?;
            info!(path = %output_path.display(), records = log.len(), "attendance exported");

            println!("✔ Excel出力: {}", output_path.display());
            println!("\n✅ エクスポート完了");
        }

        Commands::Code { action } => match action {
            CodeAction::Validate { code } => {
                if code::is_valid_equipment_code(&code) {
                    println!("✔ 有効な装備コード: {}", code);
                } else {
                    println!("✖ 形式が不正です: {}", code);
                    println!("  形式: EQ-<種別3文字>-<連番3桁>-<イニシャル><年4桁>");
                }
            }

            CodeAction::Parse { code } => match code::parse_equipment_code(&code) {
                Some(parsed) => {
                    println!("装備コード: {}", code);
                    println!(
                        "  種別: {} ({})",
                        parsed.type_code,
                        parsed.equipment_type.map(|t| t.as_str()).unwrap_or("不明")
                    );
                    println!("  連番: {}", parsed.sequence);
                    println!("  イニシャル: {}", parsed.worker_initials);
                    println!("  年: {}", parsed.year);
                }
                None => println!("✖ 形式が不正です: {}", code),
            },

            CodeAction::Generate { equipment_type, name, sequence, year } => {
                let sequence = code::check_sequence(sequence)?;
                let year = year.unwrap_or_else(|| Local::now().year() as u32);
                println!(
                    "{}",
                    code::generate_equipment_code(equipment_type, &name, sequence, year)
                );
            }
        },

        Commands::Config { set_catalog, set_log, show } => {
            if let Some(path) = set_catalog {
                config.set_catalog_path(path)?;
                println!("✔ カタログのパスを設定しました");
            }

            if let Some(path) = set_log {
                config.set_attendance_log_path(path)?;
                println!("✔ 出勤ログのパスを設定しました");
            }

            if show {
                println!("設定: {}", Config::config_path()?.display());
                println!(
                    "  カタログ: {}",
                    config
                        .catalog_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定（サンプル）".to_string())
                );
                println!("  出勤ログ: {}", config.attendance_log_path()?.display());
                println!("  出力先: {}", config.export_dir().display());
                println!("  締め時刻: {}", config.cutoff()?);
            }
        }
    }

    Ok(())
}

fn open_terminal(config: &Config, catalog_path: Option<PathBuf>) -> Result<Terminal> {
    let catalog = Catalog::load_or_sample(catalog_path.as_deref())?;
    let directories = catalog.directories()?;
    let recorder = AttendanceRecorder::new(config.cutoff()?);
    let log_path = config.attendance_log_path()?;
    let log = AttendanceLog::load(&log_path)?;

    println!("- 作業員: {}名 / 装備: {}点", directories.workers.len(), directories.equipment.len());
    println!("- 締め時刻: {}", recorder.cutoff());
    println!("- 出勤ログ: {}\n", log_path.display());

    Terminal::new(directories, recorder, log, log_path)
}

fn print_workers(catalog: &Catalog) {
    println!("作業員 ({}名)", catalog.len());
    for worker in catalog.workers() {
        println!("  [{}] {}", worker.id, worker.name);
        for t in &worker.required_equipment {
            let id = worker.equipment_items.get(t).map(String::as_str).unwrap_or("-");
            println!("      {:<10} {}", t.as_str(), id);
        }
    }
}

/// カタログを保存（パス未設定なら設定ディレクトリに保存して設定に記録）
fn save_catalog(catalog: &Catalog, path: Option<PathBuf>, config: &mut Config) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => {
            let path = Config::default_catalog_path()?;
            config.set_catalog_path(path.clone())?;
            path
        }
    };

    catalog.save(&path)?;
    println!("✔ カタログを保存: {}", path.display());
    Ok(())
}
