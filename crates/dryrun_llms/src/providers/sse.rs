//! Shared server-sent-events driver for provider streams

use futures::stream::StreamExt;
use reqwest_eventsource::{Event, EventSource};

use super::error_message;
use crate::error::{Error, Result};
use crate::types::{GenerateStream, StreamEvent};

/// Feeds every SSE `data:` payload to `parse` until the server closes the
/// stream, `done_marker` arrives, or an error occurs.
pub(crate) fn drive<F>(
    provider: &'static str,
    mut event_source: EventSource,
    done_marker: Option<&'static str>,
    mut parse: F,
) -> GenerateStream
where
    F: FnMut(&str) -> Result<Vec<StreamEvent>> + Send + 'static,
{
    let stream = async_stream::stream! {
        while let Some(event) = event_source.next().await {
            match event {
                Ok(Event::Open) => continue,
                Ok(Event::Message(message)) => {
                    if done_marker == Some(message.data.as_str()) {
                        break;
                    }
                    match parse(&message.data) {
                        Ok(events) => {
                            for stream_event in events {
                                yield Ok(stream_event);
                            }
                        }
                        Err(e) => {
                            yield Err(e);
                            break;
                        }
                    }
                }
                Err(reqwest_eventsource::Error::StreamEnded) => break,
                Err(reqwest_eventsource::Error::InvalidStatusCode(status, response)) => {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unable to read error body".to_string());
                    yield Err(Error::api(provider, status.as_u16(), error_message(&body)));
                    break;
                }
                Err(reqwest_eventsource::Error::Transport(e)) => {
                    yield Err(Error::Http(e));
                    break;
                }
                Err(e) => {
                    yield Err(Error::stream_error(format!("{provider} stream error: {e}")));
                    break;
                }
            }
        }

        event_source.close();
    };

    GenerateStream::new(Box::pin(stream))
}
