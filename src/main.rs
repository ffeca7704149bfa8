use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;

use product_search::app::SearchSession;
use product_search::kernel::services::adapters::{load_config_or_default, CatalogSearchProvider};
use product_search::kernel::UiState;

mod logging;

/// 从标准输入逐行读取查询，对本地商品目录执行搜索
#[derive(Debug, Parser)]
#[command(name = "product-search", version)]
struct Cli {
    /// 商品目录（JSON 数组）
    #[arg(long)]
    catalog: PathBuf,

    /// 管线配置（JSON），缺省使用默认值
    #[arg(long)]
    config: Option<PathBuf>,
}

enum Input {
    Line(String),
    Eof,
}

fn render(state: &UiState) {
    let mut out = io::stdout().lock();
    let _ = match state {
        UiState::Initial => Ok(()),
        UiState::Loading => writeln!(out, "searching..."),
        UiState::Success(products) if products.is_empty() => writeln!(out, "No products found"),
        UiState::Success(products) => {
            let mut result = Ok(());
            for p in products {
                result = writeln!(out, "{}\t{}\t{:.2}", p.id, p.name, p.price);
                if result.is_err() {
                    break;
                }
            }
            result
        }
        UiState::Error(message) => writeln!(out, "error: {message}"),
    };
    let _ = out.flush();
}

fn spawn_stdin_reader() -> mpsc::Receiver<Input> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Input::Line(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
        let _ = tx.send(Input::Eof);
    });
    rx
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let _logging = logging::init();

    let config = load_config_or_default(cli.config.as_deref())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let provider = CatalogSearchProvider::load(&cli.catalog)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
        .with_latency(config.catalog_latency());

    let mut session = SearchSession::new(Arc::new(provider), config)?;
    let _renderer = session.ui_state().subscribe(render);
    let input = spawn_stdin_reader();
    let tick = session.tick_interval();

    let mut eof = false;
    loop {
        loop {
            match input.try_recv() {
                Ok(Input::Line(line)) => session.on_query_changed(line),
                Ok(Input::Eof) | Err(TryRecvError::Disconnected) => {
                    eof = true;
                    break;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        session.pump(tick);

        // 输入结束后等最后一次查询落定再退出
        if eof && session.next_deadline().is_none() && !session.has_active_search() {
            break;
        }
    }

    session.shutdown();
    tracing::info!("product-search exiting");
    Ok(())
}
