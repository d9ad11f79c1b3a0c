//! EAA PKI CLI application.
//!
//! This binary provisions the root CA and service certificate on disk and
//! prints what is there.

use clap::{Parser, Subcommand};
use eaa_pki::config::PkiConfig;
use eaa_pki::error::Result;
use eaa_pki::provision::{CertKeyPair, Provisioner};
use eaa_pki::storage::KeyCertStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use x509_cert::Certificate;

#[derive(Parser)]
#[command(name = "eaa-pki")]
#[command(about = "Bootstrap the EAA root CA and service certificate", long_about = None)]
struct Cli {
    /// JSON configuration file (overrides --dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding rootCA.key, rootCA.pem, server.key and server.pem
    #[arg(long, global = true, default_value = "./certs")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ensure the root CA, then the service certificate
    Init,

    /// Ensure the root CA only
    Root,

    /// Ensure the service certificate (root CA must already exist)
    Service,

    /// Print the root CA and service certificates
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PkiConfig::from_json_file(path)?,
        None => PkiConfig::in_dir(&cli.dir),
    };
    let provisioner = Provisioner::new().with_profile(config.profile.clone());

    match cli.command {
        Commands::Init => {
            let (root, service) = provisioner.ensure_all(&config.paths)?;
            print_identity("Root CA", &root);
            print_identity("Service", &service);
        }
        Commands::Root => {
            let root = provisioner.ensure_root_ca(&config.paths)?;
            print_identity("Root CA", &root);
        }
        Commands::Service => {
            let service = provisioner.ensure_service_cert(&config.paths)?;
            print_identity("Service", &service);
        }
        Commands::Show => {
            let store = provisioner.store();
            for (label, path) in [
                ("Root CA", &config.paths.root_cert_path),
                ("Service", &config.paths.service_cert_path),
            ] {
                match store.load_cert(path) {
                    Ok(cert) => print_certificate(label, &cert),
                    Err(err) => println!("{}: {} ({})", label, path.display(), err),
                }
            }
        }
    }

    Ok(())
}

fn print_identity(label: &str, identity: &CertKeyPair) {
    print_certificate(label, identity.certificate());
}

fn print_certificate(label: &str, cert: &Certificate) {
    let tbs = &cert.tbs_certificate;
    let serial = tbs
        .serial_number
        .as_bytes()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>();

    println!("✓ {}", label);
    println!("  Subject:    {}", tbs.subject);
    println!("  Issuer:     {}", tbs.issuer);
    println!("  Serial:     {}", serial);
    println!("  Not before: {}", tbs.validity.not_before.to_date_time());
    println!("  Not after:  {}", tbs.validity.not_after.to_date_time());
}
