use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mexc_client::{ClientConfig, KlineInterval, KlineQuery, MexcClient, NewOrder, OrderSide, OrderType};

#[derive(Parser)]
#[command(name = "mexc", about = "Command line access to the MEXC spot REST API", version)]
struct Cli {
    /// Override MEXC_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check connectivity to the REST API.
    Ping,
    /// Print the exchange server time.
    Time,
    /// Print trading rules and symbol information.
    ExchangeInfo,
    /// Print the order book of a symbol.
    Depth {
        symbol: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Print the latest trades of a symbol.
    Trades {
        symbol: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Print older trades of a symbol.
    HistoricalTrades {
        symbol: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Print candlesticks of a symbol.
    Klines {
        symbol: String,
        /// 1m, 5m, 15m, 30m, 60m, 4h, 1d, 1W, 1M
        #[arg(long, default_value = "1m")]
        interval: KlineInterval,
        /// Start time in milliseconds.
        #[arg(long)]
        start: Option<i64>,
        /// End time in milliseconds.
        #[arg(long)]
        end: Option<i64>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Print the current average price of a symbol.
    AvgPrice { symbol: String },
    /// Print account information.
    Account,
    /// Print all balances.
    Balances,
    /// Print the balance of one asset.
    Balance { asset: String },
    /// Place an order (or validate it with --test).
    Order {
        symbol: String,
        side: OrderSide,
        #[arg(long = "type", default_value = "LIMIT")]
        order_type: OrderType,
        #[arg(long)]
        quantity: Option<String>,
        #[arg(long)]
        quote_qty: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        client_order_id: Option<String>,
        #[arg(long)]
        recv_window: Option<u64>,
        /// Send to /api/v3/order/test instead.
        #[arg(long)]
        test: bool,
    },
    /// Cancel one order.
    Cancel { symbol: String, order_id: String },
    /// Cancel all open orders on up to five symbols.
    CancelAll {
        #[arg(required = true, num_args = 1..)]
        symbols: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let mut config = ClientConfig::from_env().context("Failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }

    let client = MexcClient::new(config).context("Failed to create MEXC client")?;
    info!("Using {}", client.base_url());

    match cli.command {
        Command::Ping => {
            let ok = client.check_connection().await?;
            print_json(&serde_json::json!({ "connected": ok }))?;
            if !ok {
                anyhow::bail!("Ping returned an unexpected body");
            }
        }
        Command::Time => print_json(&client.server_time().await?)?,
        Command::ExchangeInfo => print_json(&client.exchange_info().await?)?,
        Command::Depth { symbol, limit } => print_json(&client.order_book(&symbol, limit).await?)?,
        Command::Trades { symbol, limit } => print_json(&client.recent_trades(&symbol, limit).await?)?,
        Command::HistoricalTrades { symbol, limit } => {
            print_json(&client.historical_trades(&symbol, limit).await?)?
        }
        Command::Klines {
            symbol,
            interval,
            start,
            end,
            limit,
        } => {
            let mut query = KlineQuery::new(symbol, interval);
            query.start_time = start;
            query.end_time = end;
            query.limit = limit;
            print_json(&client.klines(&query).await?)?
        }
        Command::AvgPrice { symbol } => print_json(&client.average_price(&symbol).await?)?,
        Command::Account => print_json(&client.account_info().await?)?,
        Command::Balances => print_json(&client.balances().await?)?,
        Command::Balance { asset } => print_json(&client.balance(&asset).await?)?,
        Command::Order {
            symbol,
            side,
            order_type,
            quantity,
            quote_qty,
            price,
            client_order_id,
            recv_window,
            test,
        } => {
            let mut order = NewOrder::new(symbol, side, order_type);
            if let Some(quantity) = quantity {
                order = order.quantity(quantity);
            }
            if let Some(quote_qty) = quote_qty {
                order = order.quote_order_qty(quote_qty);
            }
            if let Some(price) = price {
                order = order.price(price);
            }
            if let Some(id) = client_order_id {
                order = order.new_client_order_id(id);
            }
            if let Some(recv_window) = recv_window {
                order = order.recv_window(recv_window);
            }

            let ack = if test {
                client.test_order(&order).await?
            } else {
                client.place_order(&order).await?
            };
            print_json(&ack)?
        }
        Command::Cancel { symbol, order_id } => {
            print_json(&client.cancel_order(&symbol, &order_id).await?)?
        }
        Command::CancelAll { symbols } => print_json(&client.cancel_open_orders(&symbols).await?)?,
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    // stdout은 결과 JSON 전용
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", output);
    Ok(())
}
