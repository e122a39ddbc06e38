//! tarot: 互動式 AI 塔羅占卜命令列工具
//!
//! Usage:
//!   tarot [--aspect <love|career|wealth|relationships|growth>] [--deck <path>] [--seed <n>]
//!
//! Reads `GEMINI_*` settings from the environment or a `.env` file.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tarot_reader::{build_prompt, validate_question, Aspect, Deck, Error, InterpretationClient};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tarot", version, about = "AI 塔羅占卜（聖三角牌陣）")]
struct Args {
    /// Reading focus: love, career, wealth, relationships, growth
    #[arg(long)]
    aspect: Option<String>,

    /// Card dataset to use instead of the bundled major arcana
    #[arg(long)]
    deck: Option<PathBuf>,

    /// Seed for reproducible draws
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    println!("🔮 歡迎來到 AI 塔羅占卜系統...");

    let aspect = args
        .aspect
        .as_deref()
        .map(str::parse::<Aspect>)
        .transpose()?;
    let deck = match &args.deck {
        Some(path) => Deck::from_path(path)?,
        None => Deck::bundled()?,
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let client = InterpretationClient::from_env().context("cannot start interpretation client")?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let result = run(&client, &deck, aspect, &mut rng, &mut lines).await;
    client.close();
    println!("🙏 感謝使用，祝你順心。");
    result
}

async fn run<R>(
    client: &InterpretationClient,
    deck: &Deck,
    aspect: Option<Aspect>,
    rng: &mut StdRng,
    lines: &mut Lines<R>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let Some(question) = read_question(lines).await? else {
            return Ok(());
        };
        println!("你的問題：{}", question);

        let draws = deck.draw_spread(rng)?;
        println!("\n--- 🎴 抽牌結果 ---");
        for drawn in &draws {
            println!("{}", drawn);
        }

        let prompt = build_prompt(&question, &draws, aspect);
        println!("\n⏳ AI 正在深度解牌中，請稍候...");
        match interpret(client, &prompt).await {
            Ok(reading) => {
                println!("\n--- 🌟 AI 專業解牌建議 ---");
                println!("{}", reading);
            }
            Err(e) => {
                eprintln!("❌ 連結星際能量失敗，請重新翻牌。");
                eprintln!("詳細錯誤：{}", e);
            }
        }

        if !ask_for_another_round(lines).await? {
            return Ok(());
        }
    }
}

/// Await the interpretation; Ctrl-C aborts a pending retry wait.
async fn interpret(client: &InterpretationClient, prompt: &str) -> tarot_reader::Result<String> {
    let cancel = CancellationToken::new();
    let call = client.get_interpretation_with_cancel(prompt, &cancel);
    tokio::pin!(call);
    loop {
        tokio::select! {
            result = &mut call => return result,
            _ = tokio::signal::ctrl_c() => {
                warn!("interrupt received, cancelling interpretation");
                eprintln!("\n⚠️ 已取消，等待目前的請求結束...");
                cancel.cancel();
            }
        }
    }
}

fn prompt_line(text: &str) -> std::io::Result<()> {
    print!("{}", text);
    std::io::stdout().flush()
}

/// Ask until a valid question arrives. `None` on end of input.
async fn read_question<R>(lines: &mut Lines<R>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        prompt_line("\n請輸入你想占卜的問題：")?;
        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        match validate_question(&line) {
            Ok(question) => return Ok(Some(question.to_string())),
            Err(Error::InvalidInput { message, .. }) => println!("⚠️ {}", message),
            Err(e) => println!("⚠️ {}", e),
        }
    }
}

/// Ask `y/n` until answered. End of input counts as no.
async fn ask_for_another_round<R>(lines: &mut Lines<R>) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        prompt_line("\n是否要再占卜一次？(y/n)：")?;
        let Some(line) = lines.next_line().await? else {
            return Ok(false);
        };
        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("⚠️ 請輸入 y 或 n。"),
        }
    }
}
