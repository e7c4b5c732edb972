//! Basic Gemini client usage example

use gemini_client::{GeminiClient, GenerateContentRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = std::env::var("GOOGLE_AI_API_KEY")?;
    let client = GeminiClient::new();

    println!("=== Generate Content ===");
    let response = client
        .generate_content(
            &api_key,
            &GenerateContentRequest::from_prompt("What is Rust in one sentence?")
                .temperature(0.7)
                .max_output_tokens(100),
        )
        .await?;

    println!("Response: {}", response.first_text().unwrap_or_default());

    Ok(())
}
