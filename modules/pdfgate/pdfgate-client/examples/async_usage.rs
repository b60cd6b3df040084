//! Async usage example for the PDFGate client library
//!
//! Generates a PDF from HTML, stores it, then watermarks and downloads it.
//!
//! To run this example:
//! ```bash
//! export PDFGATE_API_KEY="test_your_key_here"
//! export PDFGATE_SANDBOX_DOMAIN="http://localhost:8080"  # Optional
//! cargo run --example async_usage
//! ```

use pdfgate_client::{
    DocumentSource, DocumentStatus, GeneratePdfParams, GetDocumentParams, GetFileParams,
    PageSizeType, PdfGateClient, ResponseShape, WatermarkPdfParams,
};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = PdfGateClient::from_env()?;
    println!("Using {} environment at {}\n", client.environment(), client.base_url());

    println!("=== Example 1: Generate and Store ===\n");

    let params = GeneratePdfParams {
        page_size_type: Some(PageSizeType::A4),
        print_background: Some(true),
        metadata: Some(json!({"invoice": 42})),
        ..GeneratePdfParams::from_html("<h1>Invoice #42</h1><p>Total: 99.00</p>")
    }
    .with_response(ResponseShape::Document);

    let Some(document) = client.generate_pdf(params).await?.into_document() else {
        return Err("expected a document record".into());
    };
    println!(
        "Stored document {} ({} bytes)\n",
        document.id,
        document.size.unwrap_or_default()
    );

    println!("=== Example 2: Watermark a Stored Document ===\n");

    let params = WatermarkPdfParams {
        opacity: Some(0.3),
        rotate: Some(45.0),
        ..WatermarkPdfParams::text(DocumentSource::document(&document.id), "PAID")
    };
    let watermarked = client.watermark_pdf(params).await?;
    let bytes = watermarked.into_bytes().unwrap_or_default();
    println!("Watermarked PDF: {} bytes\n", bytes.len());

    println!("=== Example 3: Retrieve ===\n");

    let record = client
        .get_document(GetDocumentParams::new(&document.id).with_pre_signed_url_expires_in(600))
        .await?;
    println!("Ready: {}", record.status == Some(DocumentStatus::Completed));
    println!("File URL: {}", record.file_url.as_deref().unwrap_or("-"));

    let file = client.get_file(GetFileParams::new(&document.id)).await?;
    println!("Downloaded {} bytes\n", file.len());

    println!("=== Example 4: Handling Errors ===\n");

    match client.get_file(GetFileParams::new("does-not-exist")).await {
        Ok(file) => println!("Unexpectedly downloaded {} bytes", file.len()),
        Err(err) if err.is_status() => println!("Service said: {err}"),
        Err(err) => return Err(err.into()),
    }

    println!("\n=== All examples completed successfully! ===");

    Ok(())
}
