//! Pixveil - hide text in plain sight
//!
//! A CLI tool for hiding text messages inside lossless images, optionally
//! protected by a password.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::PathBuf;

use pixveil::{capacity_from_bytes, decode, encode};

/// Pixveil - hide text in plain sight
///
/// Hides text messages in the pixel parity of lossless images (PNG, BMP).
/// With a password, the message is encrypted before embedding.
#[derive(Parser)]
#[command(name = "pixveil")]
#[command(version)]
#[command(about = "Hide encrypted text messages inside the pixels of lossless images")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a message inside an image
    ///
    /// The output is always PNG regardless of the input format: a lossy
    /// container would destroy the hidden message.
    Encode {
        /// Path to the cover image (any lossless format)
        #[arg(short, long)]
        image: PathBuf,

        /// Message to hide (reads from stdin if not provided)
        #[arg(short, long)]
        message: Option<String>,

        /// Encrypt the message with this password before embedding
        #[arg(short, long)]
        password: Option<String>,

        /// Output path for the encoded PNG
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Recover a hidden message from an image
    Decode {
        /// Path to the image carrying the hidden message
        #[arg(short, long)]
        image: PathBuf,

        /// Password, if the message was encrypted
        #[arg(short, long)]
        password: Option<String>,

        /// Write the message to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how many bytes an image can hide
    Capacity {
        /// Path to the image
        #[arg(short, long)]
        image: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            image,
            message,
            password,
            output,
        } => encode_cmd(&image, message, password.as_deref(), &output),

        Commands::Decode {
            image,
            password,
            output,
        } => decode_cmd(&image, password.as_deref(), output.as_ref()),

        Commands::Capacity { image } => capacity_cmd(&image),
    }
}

/// Hides a message in an image and writes the encoded PNG.
/// The message comes from --message or, failing that, stdin.
fn encode_cmd(
    image: &PathBuf,
    message: Option<String>,
    password: Option<&str>,
    output: &PathBuf,
) -> Result<()> {
    let image_bytes = std::fs::read(image)
        .with_context(|| format!("Failed to read image from {}", image.display()))?;

    let message = match message {
        Some(m) => m,
        None => {
            eprintln!("Reading message from stdin (Ctrl+D to finish):");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read message from stdin")?;
            buffer.trim().to_string()
        }
    };

    if message.is_empty() {
        anyhow::bail!("Message cannot be empty");
    }

    let encoded = encode(&image_bytes, &message, password).context("Failed to encode message")?;

    std::fs::write(output, &encoded)
        .with_context(|| format!("Failed to write encoded image to {}", output.display()))?;

    eprintln!(
        "Hidden {} bytes in {}{}",
        message.len(),
        output.display(),
        if password.is_some() { " (encrypted)" } else { "" }
    );

    Ok(())
}

/// Recovers a hidden message and prints it or writes it to a file.
fn decode_cmd(image: &PathBuf, password: Option<&str>, output: Option<&PathBuf>) -> Result<()> {
    let image_bytes = std::fs::read(image)
        .with_context(|| format!("Failed to read image from {}", image.display()))?;

    let message = decode(&image_bytes, password).context("Failed to decode message")?;

    if let Some(output_path) = output {
        std::fs::write(output_path, &message)
            .with_context(|| format!("Failed to write message to {}", output_path.display()))?;
        eprintln!("Recovered {} bytes to {}", message.len(), output_path.display());
    } else {
        println!("{}", message);
    }

    Ok(())
}

/// Prints the byte capacity of an image. Undecodable input prints 0.
fn capacity_cmd(image: &PathBuf) -> Result<()> {
    let image_bytes = std::fs::read(image)
        .with_context(|| format!("Failed to read image from {}", image.display()))?;

    println!("{}", capacity_from_bytes(&image_bytes));

    Ok(())
}
