use std::fs;

use anyhow::{Result, anyhow};
use bigdecimal::BigDecimal;
use clap::{Parser, Subcommand};
use dirs::config_dir;
use polymath_contract_wrappers::{
    Address, B256, ModuleType, PolymathClient, PrivateKeySigner, TxParams,
};
use url::Url;

/// Program to inspect and administer Polymath security token contracts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL of the Ethereum node
    #[arg(short, long, default_value = "http://localhost:8545")]
    url: String,

    /// Sign transactions with the raw key in `<config dir>/polymath/private.key`
    #[arg(long)]
    local_key: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a module factory
    Factory {
        /// Address of the factory
        address: Address,
    },
    /// Show the volume restrictions of a transfer manager
    Restrictions {
        /// Address of the volume restriction transfer manager
        address: Address,
        /// Also show the individual restrictions of this holder
        #[arg(long)]
        holder: Option<Address>,
    },
    /// Show the tiers of a USD tiered offering
    Offering {
        /// Address of the offering
        address: Address,
    },
    /// Registry commands
    Registry {
        /// Address of the registry
        #[arg(long)]
        registry: Address,
        #[command(subcommand)]
        command: RegistryCommand,
    },
}

#[derive(Debug, Subcommand)]
enum RegistryCommand {
    /// List the factories registered for a module type
    Modules {
        /// Module type code, e.g. 2 for transfer managers and 3 for offerings
        module_type: u8,
    },
    /// Show the reservation of a ticker
    Ticker {
        ticker: String,
    },
    /// Reserve a ticker in the security token registry
    RegisterTicker {
        ticker: String,
        /// Owner of the reservation. Defaults to the sender.
        #[arg(long)]
        owner: Option<Address>,
        /// Explicit gas limit
        #[arg(long)]
        gas: Option<u64>,
    },
}

impl RegistryCommand {
    async fn execute(&self, client: &PolymathClient, registry: Address) -> Result<()> {
        match self {
            RegistryCommand::Modules { module_type } => {
                self.handle_modules(client, registry, *module_type).await
            }
            RegistryCommand::Ticker { ticker } => {
                self.handle_ticker(client, registry, ticker).await
            }
            RegistryCommand::RegisterTicker { ticker, owner, gas } => {
                self.handle_register_ticker(client, registry, ticker, *owner, *gas)
                    .await
            }
        }
    }

    async fn handle_modules(
        &self,
        client: &PolymathClient,
        registry: Address,
        module_type: u8,
    ) -> Result<()> {
        let module_type = ModuleType::try_from(module_type)?;
        let registry = client.module_registry(registry);
        let factories = registry.all_modules_by_type(module_type).await?;
        println!("{} factories of type {module_type:?}:", factories.len());
        for factory in factories {
            let details = registry.factory_details(factory).await?;
            let name = client.module_factory(factory).name().await?;
            println!(
                "  {factory}: {name} (owner {}, verified: {}, used by {} tokens)",
                details.owner,
                details.is_verified,
                details.using_tokens.len()
            );
        }
        Ok(())
    }

    async fn handle_ticker(
        &self,
        client: &PolymathClient,
        registry: Address,
        ticker: &str,
    ) -> Result<()> {
        let registry = client.security_token_registry(registry);
        let details = registry.ticker_details(ticker).await?;
        if details.owner.is_zero() {
            println!("Ticker {ticker} is not reserved");
            return Ok(());
        }
        println!("Ticker {}:", ticker.to_uppercase());
        println!("  owner: {}", details.owner);
        println!("  registered: {}", details.registration_date);
        println!("  expires: {}", details.expiry_date);
        println!("  token name: {}", details.token_name);
        if details.status {
            let token = registry.security_token_address(ticker).await?;
            println!("  security token: {token}");
        }
        Ok(())
    }

    async fn handle_register_ticker(
        &self,
        client: &PolymathClient,
        registry: Address,
        ticker: &str,
        owner: Option<Address>,
        gas: Option<u64>,
    ) -> Result<()> {
        let registry = client.security_token_registry(registry);
        let owner = match owner.or(client.default_from()) {
            Some(owner) => owner,
            None => *client
                .get_accounts()
                .await?
                .first()
                .ok_or_else(|| anyhow!("No account to own the ticker"))?,
        };
        let fee = registry.ticker_registration_fee().await?;
        log::info!("Registering {ticker} for {owner}, fee {fee} USD");
        let tx = TxParams::builder().maybe_gas(gas).build();
        let pending = registry.register_new_ticker(owner, ticker, &tx).await?;
        println!("Sent transaction {}", pending.tx_hash());
        let receipt = pending.get_receipt().await?;
        println!(
            "Ticker {} registered in block {:?}",
            ticker.to_uppercase(),
            receipt.block_number
        );
        Ok(())
    }
}

async fn show_factory(client: &PolymathClient, address: Address) -> Result<()> {
    let factory = client.module_factory(address);
    println!("Factory {address}:");
    println!("  name: {}", factory.name().await?);
    println!("  title: {}", factory.title().await?);
    println!("  version: {}", factory.version().await?);
    println!("  types: {:?}", factory.types().await?);
    println!("  tags: {}", factory.tags().await?.join(", "));
    let unit = if factory.is_cost_in_poly().await? { "POLY" } else { "USD" };
    println!("  setup cost: {} {unit}", factory.setup_cost().await?);
    println!(
        "  security token versions: {} - {}",
        factory.lower_st_version_bounds().await?,
        factory.upper_st_version_bounds().await?
    );
    Ok(())
}

async fn show_restrictions(
    client: &PolymathClient,
    address: Address,
    holder: Option<Address>,
) -> Result<()> {
    let vrtm = client.volume_restriction_tm(address);
    let exempt = vrtm.exempt_addresses().await?;
    println!("Exempt wallets: {}", exempt.len());
    for wallet in exempt {
        println!("  {wallet}");
    }
    println!("Default restriction: {:?}", vrtm.default_restriction().await?);
    println!(
        "Default daily restriction: {:?}",
        vrtm.default_daily_restriction().await?
    );
    if let Some(holder) = holder {
        println!(
            "Restriction of {holder}: {:?}",
            vrtm.individual_restriction(holder).await?
        );
        println!(
            "Daily restriction of {holder}: {:?}",
            vrtm.individual_daily_restriction(holder).await?
        );
    }
    Ok(())
}

async fn show_offering(client: &PolymathClient, address: Address) -> Result<()> {
    let sto = client.usd_tiered_sto(address).await?;
    println!("Offering {address} (version {}):", sto.version());
    println!("  open: {}", sto.is_open().await?);
    println!("  finalized: {}", sto.is_finalized().await?);
    let current = sto.current_tier().await?;
    for index in 0..sto.number_of_tiers().await? {
        let tier = sto.tier(index).await?;
        let marker = if index == current { "*" } else { " " };
        println!(
            " {marker}tier {index}: {} USD per token, {} of {} minted",
            tier.rate, tier.minted_total, tier.token_total
        );
    }
    let minimum: BigDecimal = sto.minimum_investment_usd().await?;
    println!("  minimum investment: {minimum} USD");
    if let Some(v310) = sto.as_v3_1_0() {
        println!("  denominated in: {}", v310.denominated_currency().await?);
    }
    Ok(())
}

fn load_local_key() -> Result<PrivateKeySigner> {
    let mut private_key_path = config_dir().ok_or_else(|| anyhow!("Failed to get config directory"))?;
    private_key_path.push("polymath/private.key");
    let private_key_bytes = fs::read(&private_key_path)?;
    if private_key_bytes.len() != 32 {
        anyhow::bail!(
            "{} must hold a raw 32 byte key",
            private_key_path.display()
        );
    }
    let private_key = B256::from_slice(&private_key_bytes);
    PrivateKeySigner::from_bytes(&private_key)
        .map_err(|e| anyhow!("Failed to parse private key: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let url = Url::parse(&args.url)?;
    let wallet = if args.local_key {
        let signer = load_local_key()?;
        log::info!("Using local key of {}", signer.address());
        Some(signer)
    } else {
        None
    };
    let client = PolymathClient::builder()
        .rpc_url(url)
        .maybe_wallet(wallet)
        .build();

    match args.command {
        Command::Factory { address } => show_factory(&client, address).await?,
        Command::Restrictions { address, holder } => {
            show_restrictions(&client, address, holder).await?
        }
        Command::Offering { address } => show_offering(&client, address).await?,
        Command::Registry { registry, command } => command.execute(&client, registry).await?,
    }

    Ok(())
}
