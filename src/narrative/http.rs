//! Shared blocking HTTP plumbing for the network providers

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;

use crate::error::ProviderError;

pub(crate) fn build_client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::RequestFailed(e.to_string()))
}

pub(crate) fn map_send_error(err: reqwest::Error, timeout: Duration) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(timeout.as_secs())
    } else {
        ProviderError::RequestFailed(err.to_string())
    }
}

/// Turn a non-success status into the matching error
pub(crate) fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Unauthorized(body),
        _ => ProviderError::Api {
            status: status.as_u16(),
            body,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::{
        ClaudeNarrativeProvider, NarrativeContext, NarrativeService, NarrativeSource,
        OpenAiCompatibleNarrativeProvider, ProviderSettings,
    };
    use crate::questionnaire::Questionnaire;
    use crate::{CompanySize, Sector, Tier};
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    /// Consume one request (headers plus body) so the client sees a clean reply
    fn read_request(stream: &TcpStream) {
        let mut reader = BufReader::new(stream);
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap_or(0) == 0 {
                return;
            }
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }
        let mut body = vec![0; content_length];
        let _ = reader.read_exact(&mut body);
    }

    /// Answer a single request with `status` and `body`; returns the base URL
    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            read_request(&stream);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{}", addr)
    }

    /// Accept a request and never answer it
    fn serve_silence() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            read_request(&stream);
            thread::sleep(Duration::from_secs(5));
            drop(stream);
        });
        format!("http://{}", addr)
    }

    fn get(url: &str, timeout: Duration) -> Result<Response, ProviderError> {
        build_client(timeout)?
            .get(url)
            .send()
            .map_err(|e| map_send_error(e, timeout))
    }

    fn settings(base_url: String) -> ProviderSettings {
        ProviderSettings {
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
            base_url,
            timeout: Duration::from_secs(1),
        }
    }

    fn context() -> NarrativeContext {
        NarrativeContext {
            business_name: "Talleres Ejemplo".to_string(),
            sector: Sector::IndustryMetal,
            size: CompanySize::Small,
            global_index: 2.3,
            tier: Tier::Aware,
            strongest: "Technology & Infrastructure".to_string(),
            weakest: "Customers & Products".to_string(),
            dimensions: vec![],
        }
    }

    #[test]
    fn test_success_passes_through() {
        let url = serve_once("200 OK", r#"{"ok":true}"#);
        let response = check_status(get(&url, Duration::from_secs(5)).unwrap()).unwrap();
        assert_eq!(response.text().unwrap(), r#"{"ok":true}"#);
    }

    #[test]
    fn test_429_is_rate_limited() {
        let url = serve_once("429 Too Many Requests", "slow down");
        let err = check_status(get(&url, Duration::from_secs(5)).unwrap()).unwrap_err();
        assert_eq!(err, ProviderError::RateLimited);
    }

    #[test]
    fn test_401_and_403_are_unauthorized() {
        let url = serve_once("401 Unauthorized", "invalid x-api-key");
        let err = check_status(get(&url, Duration::from_secs(5)).unwrap()).unwrap_err();
        assert_eq!(
            err,
            ProviderError::Unauthorized("invalid x-api-key".to_string())
        );

        let url = serve_once("403 Forbidden", "no access");
        let err = check_status(get(&url, Duration::from_secs(5)).unwrap()).unwrap_err();
        assert_eq!(err, ProviderError::Unauthorized("no access".to_string()));
    }

    #[test]
    fn test_other_status_is_api_error() {
        let url = serve_once("500 Internal Server Error", "boom");
        let err = check_status(get(&url, Duration::from_secs(5)).unwrap()).unwrap_err();
        assert_eq!(
            err,
            ProviderError::Api {
                status: 500,
                body: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_silent_server_times_out() {
        let url = serve_silence();
        let err = get(&url, Duration::from_secs(1)).unwrap_err();
        assert_eq!(err, ProviderError::Timeout(1));
    }

    #[test]
    fn test_refused_connection_is_request_failed() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let err = get(&url, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ProviderError::RequestFailed(_)), "got {:?}", err);
    }

    #[test]
    fn test_service_falls_back_on_rate_limit() {
        let provider =
            ClaudeNarrativeProvider::new(settings(serve_once("429 Too Many Requests", "{}")))
                .unwrap();
        let q = Questionnaire::builtin();
        let narrative = NarrativeService::new(Box::new(provider), &q).narrate(&context());

        assert_eq!(
            narrative.source,
            NarrativeSource::Fallback {
                reason: ProviderError::RateLimited.to_string()
            }
        );
        assert!(narrative.text.contains("Diagnosis for Talleres Ejemplo"));
    }

    #[test]
    fn test_service_falls_back_on_unauthorized() {
        let provider = OpenAiCompatibleNarrativeProvider::new(settings(serve_once(
            "401 Unauthorized",
            "bad key",
        )))
        .unwrap();
        let q = Questionnaire::builtin();
        let narrative = NarrativeService::new(Box::new(provider), &q).narrate(&context());

        assert!(narrative.is_fallback());
        assert_eq!(
            narrative.source,
            NarrativeSource::Fallback {
                reason: "authentication rejected: bad key".to_string()
            }
        );
    }

    #[test]
    fn test_service_falls_back_on_timeout() {
        let provider = ClaudeNarrativeProvider::new(settings(serve_silence())).unwrap();
        let q = Questionnaire::builtin();
        let narrative = NarrativeService::new(Box::new(provider), &q).narrate(&context());

        assert_eq!(
            narrative.source,
            NarrativeSource::Fallback {
                reason: "request timed out after 1s".to_string()
            }
        );
        assert!(!narrative.text.trim().is_empty());
    }

    #[test]
    fn test_service_uses_generated_text_on_success() {
        let url = serve_once(
            "200 OK",
            r##"{"content":[{"type":"text","text":"## Roadmap\n- Step 1"}]}"##,
        );
        let provider = ClaudeNarrativeProvider::new(settings(url)).unwrap();
        let q = Questionnaire::builtin();
        let narrative = NarrativeService::new(Box::new(provider), &q).narrate(&context());

        assert_eq!(narrative.text, "## Roadmap\n- Step 1");
        assert_eq!(
            narrative.source,
            NarrativeSource::Generated {
                provider: "anthropic".to_string()
            }
        );
    }
}
