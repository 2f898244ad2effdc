use anyhow::{bail, Context, Result};
use futures::StreamExt;
use huddle_core::constants::endpoints;
use huddle_core::{AgentFrame, FrameDecoder};

/// Post a request to a running server and hand each decoded frame to
/// `on_frame` as it arrives. Returns the number of frames received.
pub async fn ask(
    server: &str,
    request: &str,
    mut on_frame: impl FnMut(&AgentFrame),
) -> Result<usize> {
    let url = format!("{}{}", server.trim_end_matches('/'), endpoints::COLLABORATE_PATH);
    let response = reqwest::Client::new()
        .post(&url)
        .json(&serde_json::json!({ "request": request }))
        .send()
        .await
        .with_context(|| format!("could not reach {url}"))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        bail!("server returned {status}: {text}");
    }

    let mut decoder = FrameDecoder::new();
    let mut count = 0;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("stream interrupted")?;
        for frame in decoder.push(&chunk) {
            match frame {
                Ok(frame) => {
                    count += 1;
                    on_frame(&frame);
                }
                Err(e) => tracing::warn!("Skipping malformed frame: {}", e),
            }
        }
    }

    if let Some(frame) = decoder.finish() {
        match frame {
            Ok(frame) => {
                count += 1;
                on_frame(&frame);
            }
            Err(e) => tracing::warn!("Skipping malformed trailing frame: {}", e),
        }
    }

    Ok(count)
}

/// Human-readable rendering of one frame for the terminal.
pub fn render_frame(frame: &AgentFrame) -> String {
    let heading = match frame.kind {
        Some(kind) => format!("── {} [{}] ", frame.agent, kind),
        None => format!("── {} ", frame.agent),
    };
    format!("{heading}──\n{}\n", frame.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_core::Category;

    #[test]
    fn render_with_and_without_category() {
        let mut frame = AgentFrame {
            agent: "Architect".to_string(),
            message: "Use layers.".to_string(),
            timestamp: 1,
            kind: Some(Category::Plan),
        };
        assert_eq!(render_frame(&frame), "── Architect [plan] ──\nUse layers.\n");

        frame.kind = None;
        assert_eq!(render_frame(&frame), "── Architect ──\nUse layers.\n");
    }
}
