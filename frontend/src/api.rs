use gloo_net::http::Request;

use crate::models::{RelayReply, RelayRequest};

/// Base URL of the relay service.
const API_BASE: &str = "http://localhost:3001";

const NO_RESPONSE: &str = "Sorry, I couldn't get a response from Gemini.";

/// Sends `message` to the relay. Every outcome, failures included, comes back
/// as text that can go straight into a bot bubble.
pub async fn ask_relay(message: &str) -> String {
    match post_message(message).await {
        Ok((ok, body)) => reply_text(ok, body),
        Err(e) => format!("Sorry, there was an error contacting Gemini. ({e})"),
    }
}

async fn post_message(message: &str) -> Result<(bool, RelayReply), String> {
    let body = RelayRequest { message: message.to_string() };

    let resp = Request::post(&format!("{API_BASE}/api/gemini"))
        .json(&body)
        .map_err(|e| format!("Serialize error: {e}"))?
        .send()
        .await
        .map_err(|e| format!("Network error: {e}"))?;

    let ok = resp.ok();
    let reply = resp
        .json::<RelayReply>()
        .await
        .map_err(|e| format!("Parse error: {e}"))?;
    Ok((ok, reply))
}

fn reply_text(ok: bool, body: RelayReply) -> String {
    match body {
        RelayReply { reply: Some(reply), .. } if ok && !reply.is_empty() => reply,
        RelayReply { error: Some(error), details: Some(details), .. } => {
            format!("Gemini error: {error} - {details}")
        }
        RelayReply { error: Some(error), .. } => format!("Gemini error: {error}"),
        _ => NO_RESPONSE.to_string(),
    }
}
