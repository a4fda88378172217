//! SHADE CLI
//!
//! Command-line interface for the SHADE dual-key stealth address protocol.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shade_core::config::DomainConfig;
use shade_core::types::{AuditGrant, CompressedPoint, ReceiverAddress, StealthPayment};
use shade_stealth::{
    create_stealth_payment, create_stealth_payment_with_ephemeral, scan_payments, Auditor,
    PaymentDetector, Receiver, ReceiverKeys, SpendAuthorization, StealthAddressProtocol,
};

/// SHADE - Dual-key stealth addresses with delegated auditing
#[derive(Parser)]
#[command(name = "shade")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the whole protocol with fresh keys
    Demo {
        /// Application data to sign with the one-time key (hex)
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Generate new receiver keys
    Generate {
        /// Output file for keys (JSON); the audit grant goes next to it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a stealth payment to a receiver address
    Send {
        /// Receiver address (hex, scan_pk || spend_pk)
        address: String,
    },

    /// Check a payment with the receiver's keys
    Scan {
        /// Keys file produced by `generate`
        #[arg(short, long)]
        keys: PathBuf,

        /// Payment JSON as printed by `send`
        payment: String,

        /// Sign this message (hex) with the one-time key if the payment is ours
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Check a payment with an audit grant
    Audit {
        /// Grant file produced by `generate`
        #[arg(short, long)]
        grant: PathBuf,

        /// Payment JSON as printed by `send`
        payment: String,
    },

    /// Verify a spend signature against a one-time address
    Verify {
        /// One-time address (hex)
        #[arg(short, long)]
        address: String,

        /// Signed message (hex)
        #[arg(short, long)]
        message: String,

        /// DER signature (hex)
        #[arg(short, long)]
        signature: String,
    },

    /// Run a local send/scan benchmark
    Bench {
        /// Number of payments to create and scan
        #[arg(short, long, default_value = "1000")]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DomainConfig::from_env().context("Invalid SHADE configuration")?;
    debug!(kdf_key_len = config.kdf_key_len, nonce_mode = %config.nonce_mode, "Loaded configuration");
    let protocol = StealthAddressProtocol::from_config(config)?;

    match cli.command {
        Commands::Demo { message } => cmd_demo(&protocol, message.as_deref()),
        Commands::Generate { output } => cmd_generate(&protocol, output),
        Commands::Send { address } => cmd_send(&protocol, &address),
        Commands::Scan {
            keys,
            payment,
            message,
        } => cmd_scan(&protocol, &keys, &payment, message.as_deref()),
        Commands::Audit { grant, payment } => cmd_audit(&protocol, &grant, &payment),
        Commands::Verify {
            address,
            message,
            signature,
        } => cmd_verify(&protocol, &address, &message, &signature),
        Commands::Bench { count } => cmd_bench(&protocol, count),
    }
}

fn parse_payment(json: &str) -> Result<StealthPayment> {
    let payment: StealthPayment = serde_json::from_str(json).context("Invalid payment JSON")?;
    payment.validate()?;
    Ok(payment)
}

fn read_json_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Walk through the whole protocol
fn cmd_demo(protocol: &StealthAddressProtocol, message: Option<&str>) -> Result<()> {
    let data = match message {
        Some(hex_msg) => {
            hex::decode(hex_msg.trim_start_matches("0x")).context("Invalid message hex")?
        }
        None => b"SHADE demo spend".to_vec(),
    };

    println!("{}", "🕶  SHADE protocol walkthrough".cyan().bold());
    println!("   {} {}", "Curve:".dimmed(), protocol.domain().name());
    println!("   {} {}", "Nonce mode:".dimmed(), protocol.domain().nonce_mode());

    // 1. Receiver keys
    println!("\n{}", "1. Receiver generates scan and spend keys".yellow().bold());
    let scan = protocol.generate_key_pair();
    let spend = protocol.generate_key_pair();
    let receiver = Receiver::from_key_pairs(protocol.clone(), scan.clone(), spend.clone())?;
    println!("   {} {}", "Address:".dimmed(), receiver.address().to_hex());

    // 2. Audit grant
    println!("\n{}", "2. Receiver hands (s, B) to an auditor".yellow().bold());
    let auditor = Auditor::from_grant(protocol.clone(), &receiver.audit_grant())?;
    println!("   {} {}", "Grant spend key:".dimmed(), auditor.spend_public_key());

    // 3. Sender
    println!("\n{}", "3. Sender pays to a one-time address".yellow().bold());
    let ephemeral = protocol.generate_key_pair();
    let payment = create_stealth_payment_with_ephemeral(protocol, receiver.address(), &ephemeral)?;
    println!("   {} {}", "Ephemeral key:".dimmed(), payment.ephemeral_pk);
    println!("   {} {}", "One-time address:".dimmed(), payment.one_time_address);

    // 4. Receiver discovery
    println!("\n{}", "4. Receiver recognises the payment".yellow().bold());
    let Some(one_time) = receiver.try_discover(&payment) else {
        bail!("receiver did not recognise its own payment");
    };
    println!("   {} {}", "Recovered address:".dimmed(), one_time.public_key());

    // 5. Auditor detection
    println!("\n{}", "5. Auditor recognises the payment".yellow().bold());
    if !auditor.detect(&payment)? {
        bail!("auditor did not recognise the payment");
    }
    println!("   {} detected without the spend key", "✓".green());

    // 6. Spend proof
    println!("\n{}", "6. Receiver signs with the one-time key".yellow().bold());
    let proof = receiver.prove_spend(&payment, &data)?;
    let valid = protocol.verify_spend(&proof);
    println!("   {} {}", "Signature:".dimmed(), proof.signature.to_hex());
    println!("   {} {}", "Verifies against C:".dimmed(), valid);

    // Full checked run with the same keys
    let transcript = protocol.execute(&scan, &spend, &ephemeral, &data)?;
    if transcript.one_time_address != payment.one_time_address {
        bail!("protocol run disagrees with the sender's one-time address");
    }

    println!("\n{}", "✅ All parties agree".green().bold());
    Ok(())
}

/// Generate new receiver keys
fn cmd_generate(protocol: &StealthAddressProtocol, output: Option<PathBuf>) -> Result<()> {
    println!("{}", "🔑 Generating SHADE keys...".cyan().bold());

    let receiver = Receiver::generate(protocol.clone());
    let keys_json = receiver.export_keys().to_json()?;
    let grant_json = serde_json::to_string_pretty(&receiver.audit_grant())?;

    if let Some(path) = output {
        std::fs::write(&path, &keys_json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        let grant_path = path.with_extension("grant.json");
        std::fs::write(&grant_path, &grant_json)
            .with_context(|| format!("Failed to write {}", grant_path.display()))?;
        println!("{} {}", "✅ Keys saved to:".green(), path.display());
        println!("{} {}", "✅ Audit grant saved to:".green(), grant_path.display());
    } else {
        println!("\n{}", "Keys (JSON):".yellow().bold());
        println!("{}", keys_json);
        println!("\n{}", "Audit grant (JSON):".yellow().bold());
        println!("{}", grant_json);
    }

    println!("\n{} {}", "📬 Address:".green().bold(), receiver.address().to_hex());
    println!("\n{}", "⚠️  IMPORTANT: Keep your secret keys safe!".red().bold());
    println!("   spend_sk must never be shared. Share scan_sk only with auditors.");

    Ok(())
}

/// Create a stealth payment
fn cmd_send(protocol: &StealthAddressProtocol, address_hex: &str) -> Result<()> {
    let address = ReceiverAddress::from_hex(address_hex).context("Invalid receiver address hex")?;

    let payment =
        create_stealth_payment(protocol, &address).context("Failed to create stealth payment")?;

    println!("{}", "💸 Stealth payment created:".green().bold());
    println!("   {} {}", "One-time address:".yellow(), payment.one_time_address);
    println!("   {} {}", "Ephemeral key:".dimmed(), payment.ephemeral_pk);

    println!("\n{}", "📋 Payment (JSON):".yellow().bold());
    println!("{}", serde_json::to_string(&payment)?);

    println!("\n{}", "ℹ️  Next steps:".cyan());
    println!("   1. Send funds to the one-time address above");
    println!("   2. Publish the ephemeral key alongside the transaction");

    Ok(())
}

/// Check a payment with the receiver's keys
fn cmd_scan(
    protocol: &StealthAddressProtocol,
    keys_path: &Path,
    payment_json: &str,
    message: Option<&str>,
) -> Result<()> {
    let keys = ReceiverKeys::from_json(&read_json_file(keys_path)?).context("Invalid keys file")?;
    let receiver = Receiver::from_keys(protocol.clone(), &keys)?;
    let payment = parse_payment(payment_json)?;

    let Some(one_time) = receiver.try_discover(&payment) else {
        println!("{}", "No payment for these keys.".yellow());
        return Ok(());
    };

    println!("{}", "✅ Payment is ours".green().bold());
    println!("   {} {}", "One-time address:".yellow(), one_time.public_key());
    println!("   {} {}", "One-time private key:".red(), one_time.private_key().to_hex());

    if let Some(hex_msg) = message {
        let data = hex::decode(hex_msg.trim_start_matches("0x")).context("Invalid message hex")?;
        let proof = receiver.prove_spend(&payment, &data)?;
        println!("\n{}", "📋 Spend proof (JSON):".yellow().bold());
        println!("{}", serde_json::to_string_pretty(&proof)?);
    }

    Ok(())
}

/// Check a payment with an audit grant
fn cmd_audit(protocol: &StealthAddressProtocol, grant_path: &Path, payment_json: &str) -> Result<()> {
    let grant: AuditGrant =
        serde_json::from_str(&read_json_file(grant_path)?).context("Invalid grant file")?;
    let auditor = Auditor::from_grant(protocol.clone(), &grant)?;
    let payment = parse_payment(payment_json)?;

    if auditor.detect(&payment)? {
        println!("{} {}", "✅ Payment belongs to".green().bold(), grant.spend_pk);
    } else {
        println!("{}", "Payment does not belong to this receiver.".yellow());
    }

    Ok(())
}

/// Verify a spend signature
fn cmd_verify(
    protocol: &StealthAddressProtocol,
    address_hex: &str,
    message_hex: &str,
    signature_hex: &str,
) -> Result<()> {
    let address = CompressedPoint::from_hex(address_hex).context("Invalid address hex")?;
    let message = hex::decode(message_hex.trim_start_matches("0x")).context("Invalid message hex")?;
    let signature =
        hex::decode(signature_hex.trim_start_matches("0x")).context("Invalid signature hex")?;

    if let Ok(auth) = SpendAuthorization::from_message(&message) {
        println!("   {} {}", "Amount:".dimmed(), auth.amount);
        println!("   {} {}", "Nonce:".dimmed(), auth.nonce);
    }

    check_signature(protocol, &message, &signature, &address)?;
    println!("{}", "✅ Signature valid".green().bold());
    Ok(())
}

/// Fails unless `signature` is a valid signature over `message` by `address`.
fn check_signature(
    protocol: &StealthAddressProtocol,
    message: &[u8],
    signature: &[u8],
    address: &CompressedPoint,
) -> Result<()> {
    match protocol.signer().try_verify(message, signature, address) {
        Ok(true) => Ok(()),
        Ok(false) => bail!("Signature invalid"),
        Err(e) => Err(e).context("Malformed signature input"),
    }
}

/// Run benchmarks
fn cmd_bench(protocol: &StealthAddressProtocol, count: usize) -> Result<()> {
    println!("{} {} payments", "📊 Benchmarking with".cyan().bold(), count);

    // Generate keys
    println!("\n{}", "1. Generating keys...".dimmed());
    let start = Instant::now();
    let receiver = Receiver::generate(protocol.clone());
    let stranger = Receiver::generate(protocol.clone());
    let auditor = Auditor::from_grant(protocol.clone(), &receiver.audit_grant())?;
    println!("   ✓ Key generation: {:?}", start.elapsed());

    // Create payments
    println!("\n{}", "2. Creating payments...".dimmed());
    let pb = ProgressBar::new(count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("   [{bar:40.cyan/blue}] {pos}/{len}")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut payments = Vec::with_capacity(count);
    for i in 0..count {
        // One in a hundred is ours
        let to = if i % 100 == 0 { &receiver } else { &stranger };
        payments.push(create_stealth_payment(protocol, to.address())?);
        pb.inc(1);
    }
    pb.finish();
    println!("   ✓ Created {} payments: {:?}", count, start.elapsed());

    // Scan
    println!("\n{}", "3. Scanning as auditor...".dimmed());
    let report = scan_payments(&auditor, &payments);
    let stats = &report.stats;

    println!("   ✓ Scanned {} payments: {} ms", stats.total_scanned, stats.duration_ms);
    println!("   ✓ Found {} payments", stats.detected);
    println!("\n{}", "📈 Results:".green().bold());
    println!("   Scan rate: {:.0} payments/sec", stats.rate());

    let expected = count.div_ceil(100);
    if report.matches.len() == expected {
        println!("   {} All expected payments found!", "✅".green());
    } else {
        println!("   {} Expected {}, found {}", "❌".red(), expected, report.matches.len());
    }

    Ok(())
}
