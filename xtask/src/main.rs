//! Build automation for template-repository
//!
//! Usage: cargo xtask <command>
//!
//! Available commands:
//! - build: Build the project
//! - test: Run tests
//! - run: Start the service against a local catalog
//! - dist: Create a distribution tarball
//! - ci: Run CI checks

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xshell::{cmd, Shell};

const BINARY: &str = "template-repository";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for template-repository")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the project
    Build {
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        /// Run only the HTTP API and client tests
        #[arg(long)]
        integration: bool,
    },
    /// Start the service against a local catalog
    Run {
        /// Catalog root directory
        #[arg(long, default_value = "./catalogData")]
        catalog: String,
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,
    },
    /// Create a distribution tarball
    Dist {
        /// Target triple (e.g., x86_64-unknown-linux-gnu)
        #[arg(long)]
        target: Option<String>,
    },
    /// Run CI checks (format, clippy, test)
    Ci,
    /// Format code
    Format {
        /// Check formatting without modifying files
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    sh.change_dir(project_root()?);

    match cli.command {
        Commands::Build { release } => build(&sh, release),
        Commands::Test { integration } => test(&sh, integration),
        Commands::Run { catalog, port } => run(&sh, &catalog, port),
        Commands::Dist { target } => dist(&sh, target),
        Commands::Ci => ci(&sh),
        Commands::Format { check } => format(&sh, check),
        Commands::Clippy => clippy(&sh),
    }
}

fn build(sh: &Shell, release: bool) -> Result<()> {
    println!("🔨 Building {}...", BINARY);

    if release {
        cmd!(sh, "cargo build --release --bin {BINARY}").run()?;
        println!("✅ Release build completed: target/release/{}", BINARY);
    } else {
        cmd!(sh, "cargo build --bin {BINARY}").run()?;
        println!("✅ Debug build completed: target/debug/{}", BINARY);
    }

    Ok(())
}

fn test(sh: &Shell, integration: bool) -> Result<()> {
    println!("🧪 Running tests...");

    if integration {
        cmd!(sh, "cargo test --test api_test --test client_test").run()?;
    } else {
        cmd!(sh, "cargo test --all").run()?;
    }

    println!("✅ All tests passed");
    Ok(())
}

fn run(sh: &Shell, catalog: &str, port: u16) -> Result<()> {
    if !sh.path_exists(catalog) {
        anyhow::bail!("Catalog {} does not exist", catalog);
    }

    let port = port.to_string();
    cmd!(
        sh,
        "cargo run --bin {BINARY} -- serve --catalog-path {catalog} --port {port}"
    )
    .env("LOG_LEVEL", "debug")
    .run()?;
    Ok(())
}

fn dist(sh: &Shell, target: Option<String>) -> Result<()> {
    println!("📦 Creating distribution package...");

    let binary_src = match target {
        Some(ref target_triple) => {
            cmd!(sh, "cargo build --release --bin {BINARY} --target {target_triple}").run()?;
            format!("target/{}/release/{}", target_triple, BINARY)
        }
        None => {
            cmd!(sh, "cargo build --release --bin {BINARY}").run()?;
            format!("target/release/{}", BINARY)
        }
    };

    let dist_dir = project_root()?.join("dist");
    sh.create_dir(&dist_dir)?;
    sh.copy_file(project_root()?.join(binary_src), dist_dir.join(BINARY))?;

    let version = env!("CARGO_PKG_VERSION");
    let archive_name = format!("{}-{}.tar.gz", BINARY, version);

    cmd!(sh, "tar -czf {archive_name} -C dist {BINARY}")
        .run()
        .context("Failed to create tarball")?;

    println!("✅ Distribution package created: {}", archive_name);
    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    println!("🔍 Running CI checks...");

    println!("\n📝 Checking formatting...");
    format(sh, true)?;

    println!("\n🔧 Running clippy...");
    clippy(sh)?;

    println!("\n🧪 Running tests...");
    test(sh, false)?;

    println!("\n✅ All CI checks passed!");
    Ok(())
}

fn format(sh: &Shell, check: bool) -> Result<()> {
    if check {
        cmd!(sh, "cargo fmt --all -- --check").run()?;
        println!("✅ Code formatting is correct");
    } else {
        cmd!(sh, "cargo fmt --all").run()?;
        println!("✅ Code formatted");
    }
    Ok(())
}

fn clippy(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo clippy --all-targets -- -D warnings").run()?;
    println!("✅ Clippy checks passed");
    Ok(())
}

fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live inside the workspace")
}
