//! Briefing Bot CLI
//!
//! An interactive command-line interface for news, weather and stock prices.
//!
//! # Usage
//!
//! ```bash
//! # Keys for the default providers (or put them in .env)
//! export NEWS_API_KEY="..."
//! export WEATHER_API_KEY="..."
//!
//! # Run the bot
//! cargo run --bin briefing-bot -p agent-briefing
//!
//! # Key-less providers
//! cargo run --bin briefing-bot -p agent-briefing -- --news-provider rss --weather-provider wttr
//! cargo run --bin briefing-bot -p agent-briefing -- --news-provider scrape
//!
//! # One-shot
//! cargo run --bin briefing-bot -p agent-briefing -- --query "stock change TCS 1 year"
//! cargo run --bin briefing-bot -p agent-briefing -- --stock "Tata Motors" --weather Pune
//! ```

use agent_briefing::bot::{BotConfig, BotReply, BriefingBot};
use agent_briefing::{BriefingConfig, NewsProvider, WeatherProvider};
use clap::Parser;
use std::io::{self, BufRead, Write};

#[derive(Parser, Debug)]
#[command(name = "briefing-bot")]
#[command(about = "Ask for news, weather and Indian stock prices", long_about = None)]
struct Args {
    /// Answer one query and exit
    #[arg(short, long)]
    query: Option<String>,

    /// Show the latest price and 1-day change for a company or ticker and exit
    #[arg(long, value_name = "NAME")]
    stock: Option<String>,

    /// Show current weather for a location and exit
    #[arg(long, value_name = "LOCATION")]
    weather: Option<String>,

    /// Headlines per news reply
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u8).range(1..=50))]
    news_count: Option<u8>,

    /// Headline provider: newsapi, rss or scrape
    #[arg(long)]
    news_provider: Option<NewsProvider>,

    /// Weather provider: openweather or wttr
    #[arg(long)]
    weather_provider: Option<WeatherProvider>,

    /// Location used when a weather query names none
    #[arg(long)]
    default_location: Option<String>,
}

impl Args {
    fn is_one_shot(&self) -> bool {
        self.query.is_some() || self.stock.is_some() || self.weather.is_some()
    }

    /// Flags first, then environment, then defaults
    fn briefing_config(&self) -> agent_briefing::Result<BriefingConfig> {
        let mut builder = BriefingConfig::builder();
        if let Some(provider) = self.news_provider {
            builder = builder.news_provider(provider);
        }
        if let Some(provider) = self.weather_provider {
            builder = builder.weather_provider(provider);
        }
        if let Some(count) = self.news_count {
            builder = builder.news_count(usize::from(count));
        }
        if let Some(location) = &self.default_location {
            builder = builder.default_location(location.clone());
        }
        builder.with_env().build()
    }
}

fn print_banner() {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║                        Briefing Bot                          ║
║                                                              ║
║  Ask:                                                        ║
║    news [category]            - Top headlines                ║
║    weather [city]             - Current conditions           ║
║    stock <company|ticker>     - Latest price                 ║
║    stock change TCS 1 year    - Change over a period         ║
║                                                              ║
║  Commands:                                                   ║
║    /read <n>  /history  /help  /exit                         ║
╚══════════════════════════════════════════════════════════════╝
"#
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    agent_utils::load_dotenv();
    agent_utils::init_tracing_with("warn,agent_briefing=info");

    let args = Args::parse();
    let briefing = args.briefing_config()?;

    let mut bot = BriefingBot::new(BotConfig::builder().briefing(briefing).build())?;

    if args.is_one_shot() {
        if let Some(name) = &args.stock {
            println!("{}", bot.dispatcher().stock_quote(name).await);
        }
        if let Some(location) = &args.weather {
            println!("{}", bot.dispatcher().weather(Some(location.as_str())).await);
        }
        if let Some(query) = &args.query {
            if let BotReply::Message(text) = bot.process_input(query).await? {
                println!("{text}");
            }
        }
        return Ok(());
    }

    if !agent_utils::env_flag("BRIEFING_NO_BANNER") {
        print_banner();
    }
    println!("{}\n", bot.welcome());

    // Run REPL
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", bot.prompt());
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match bot.process_input(input).await {
            Ok(BotReply::Message(text)) => println!("{text}\n"),
            Ok(BotReply::Exit) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => eprintln!("Error: {e}\n"),
        }
    }

    Ok(())
}
