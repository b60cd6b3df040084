//! Blocking (sync) usage example for the PDFGate client library
//!
//! Suitable for scripts and build steps that have no async runtime. The
//! client starts its own worker runtime when none is running.
//!
//! To run this example:
//! ```bash
//! export PDFGATE_API_KEY="test_your_key_here"
//! cargo run --example blocking_usage -- form.pdf
//! ```

use std::sync::mpsc;
use std::time::Duration;

use pdfgate_client::{
    CompressPdfParams, EncryptionAlgorithm, ExtractPdfFormDataParams, FileParam,
    FlattenPdfParams, PdfGateClient, ProtectPdfParams,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "form.pdf".to_owned());
    let file = FileParam::new(path.as_str(), std::fs::read(&path)?);

    let client = PdfGateClient::from_env()?;

    println!("=== Example 1: Extract Form Data ===\n");

    let fields = client.extract_pdf_form_data_blocking(ExtractPdfFormDataParams::new(file.clone()))?;
    for (name, value) in &fields {
        println!("{name}: {value}");
    }

    println!("\n=== Example 2: Flatten, Protect, Compress ===\n");

    let flattened = client
        .flatten_pdf_blocking(FlattenPdfParams::new(file.clone()))?
        .into_bytes()
        .unwrap_or_default();
    println!("Flattened: {} bytes", flattened.len());

    let protect = ProtectPdfParams {
        algorithm: Some(EncryptionAlgorithm::Aes256),
        owner_password: Some("owner-secret".to_owned()),
        disable_editing: Some(true),
        ..ProtectPdfParams::new(FileParam::new("flattened.pdf", flattened))
    };
    let protected = client.protect_pdf_blocking(protect)?.into_bytes().unwrap_or_default();
    println!("Protected: {} bytes", protected.len());

    let compress = CompressPdfParams {
        linearize: Some(true),
        ..CompressPdfParams::new(file)
    };
    let compressed = client.compress_pdf_blocking(compress)?.into_bytes().unwrap_or_default();
    std::fs::write("compressed.pdf", &compressed)?;
    println!("Compressed: {} bytes -> compressed.pdf\n", compressed.len());

    println!("=== Example 3: Callbacks ===\n");

    let call = client.prepare(FlattenPdfParams::new(FileParam::new("flattened.pdf", protected)))?;
    let (tx, rx) = mpsc::channel();
    let failure_tx = tx.clone();
    call.enqueue(
        move |response| drop(tx.send(format!("{} response", response.shape()))),
        move |err| drop(failure_tx.send(format!("failed: {err}"))),
    )?;
    println!("Callback: {}", rx.recv_timeout(Duration::from_secs(300))?);

    println!("\n=== All examples completed successfully! ===");

    Ok(())
}
