//! 주식 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 자유 텍스트 질의 분석
//! analyst analyze "How has TSLA done over 6mo?"
//!
//! # 심볼 직접 지정, 주봉, JSON 출력
//! analyst analyze --symbol MSFT --period 2y --interval 1wk --json
//!
//! # 내러티브 포함
//! analyst analyze "Show me Apple stock" --narrate
//!
//! # 기간 토큰 확인
//! analyst period 3mo
//! ```

use analyst_cli::commands::analyze::{run_analyze, AnalyzeOptions};
use analyst_cli::commands::period::describe_period;
use analyst_core::{init_logging, AppConfig, LogConfig};
use clap::{Parser, Subcommand};
use tracing::error;

#[derive(Parser)]
#[command(name = "analyst")]
#[command(about = "Stock analyst CLI - Yahoo Finance 기반 기술적/펀더멘털 분석", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 종목 분석 (조회 → 지표 → 요약)
    Analyze {
        /// 자유 텍스트 질의 (예: "How has TSLA done over 6mo?")
        #[arg(default_value = "")]
        query: String,

        /// 종목 심볼 (지정 시 질의 해석 생략)
        #[arg(short, long)]
        symbol: Option<String>,

        /// 분석 기간 (예: 30d, 6mo, 1y, max)
        #[arg(short, long)]
        period: Option<String>,

        /// 캔들 간격 (예: 1d, 1wk, 1h)
        #[arg(short, long)]
        interval: Option<String>,

        /// JSON으로 출력
        #[arg(long, default_value = "false")]
        json: bool,

        /// 내러티브 생성 (언어 모델 또는 템플릿)
        #[arg(long, default_value = "false")]
        narrate: bool,

        /// 설정 파일
        #[arg(short, long, default_value = "config/default.toml")]
        config: String,
    },

    /// 기간 토큰을 일수로 변환해 출력
    Period {
        /// 기간 토큰 (예: 3mo, 2w, 1y, max)
        token: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            query,
            symbol,
            period,
            interval,
            json,
            narrate,
            config,
        } => {
            let config = AppConfig::load(&config)?;
            init_logging(LogConfig::from_app_config(&config.logging))
                .map_err(|e| anyhow::anyhow!("logging init failed: {}", e))?;

            if query.trim().is_empty() && symbol.is_none() {
                anyhow::bail!("질의 또는 --symbol 중 하나가 필요합니다");
            }

            let options = AnalyzeOptions {
                query,
                symbol,
                period,
                interval,
                json,
                narrate,
            };
            match run_analyze(options, &config).await {
                Ok(output) => println!("{}", output),
                Err(e) => {
                    error!("분석 실패: {}", e);
                    return Err(e);
                }
            }
        }
        Commands::Period { token } => {
            println!("{}", describe_period(&token)?);
        }
    }

    Ok(())
}
