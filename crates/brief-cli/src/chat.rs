//! `chat` command
//!
//! Session-memory REPL. Price and market questions are answered from a
//! fresh snapshot; everything else is acknowledged until filing-backed
//! chat is wired up.

use brief_agents::{MarketData, YahooMarketAgent, format};
use brief_memory::SessionMemory;
use std::io::{BufRead, Write};

pub async fn run(ticker: &str) -> anyhow::Result<()> {
    println!("Chat mode for {ticker}");
    println!("Type 'exit' to quit\n");

    let mut session = SessionMemory::new();
    let agent = YahooMarketAgent::new();

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!("You: ");
        stdout.flush()?;

        let mut query = String::new();
        if stdin.lock().read_line(&mut query)? == 0 {
            break;
        }
        let query = query.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        session.add_turn("user", query);
        let response = answer(&agent, ticker, query).await;
        println!("\n[Assistant] {response}\n");
        session.add_turn("assistant", response);
    }

    Ok(())
}

async fn answer(agent: &YahooMarketAgent, ticker: &str, query: &str) -> String {
    let lowered = query.to_lowercase();
    if lowered.contains("price") || lowered.contains("market") {
        match agent.fetch(ticker).await {
            Ok(snapshot) => format!(
                "Current price: {}, Market cap: {}",
                format::price(snapshot.current_price),
                format::large_amount(snapshot.market_cap),
            ),
            Err(e) => format!("Could not fetch market data for {ticker}: {e}"),
        }
    } else {
        format!("Question about {ticker}: {query}\n\n(Full chat requires indexed filings.)")
    }
}
