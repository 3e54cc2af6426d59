use crate::error::Result;
use crate::pipeline::event::EventMsg;
use crate::pipeline::{PipelineReceiver, PipelineSender};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

/// Decode newline-delimited JSON events from `reader` and feed them to `sender`.
///
/// Blank lines are ignored, undecodable lines (bad JSON, bad UTF-8) are logged and
/// skipped. Stops at end of input or when the pipeline stops accepting events.
/// Returns the number of events forwarded; only read failures are errors.
pub async fn read_events<R>(mut reader: R, sender: &PipelineSender) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    let mut forwarded = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        line_no += 1;

        if buf.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let event = match serde_json::from_slice::<EventMsg>(&buf) {
            Ok(event) => event,
            Err(e) => {
                warn!("Skipping malformed event on line {}: {}", line_no, e);
                continue;
            }
        };

        if sender.send(event).await.is_err() {
            warn!("Pipeline closed, stopped reading at line {}", line_no);
            break;
        }
        forwarded += 1;
    }

    Ok(forwarded)
}

/// Encode every event from `receiver` as one JSON line on `writer`.
pub async fn write_events<W>(mut receiver: PipelineReceiver, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(event) = receiver.recv().await {
        let mut line = serde_json::to_vec(&event)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
    }
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::create_pipeline_channel;
    use crate::pipeline::event::Value;

    #[tokio::test]
    async fn test_read_skips_bad_lines() {
        let mut input = Vec::new();
        input.extend_from_slice(b"{\"name\":\"a\",\"values\":{\"n\":1}}\n");
        input.extend_from_slice(b"\n   \n");
        input.extend_from_slice(b"\xff\xfe bad\n");
        input.extend_from_slice(b"{\"name\":\"b\"}\n");
        input.extend_from_slice(b"not json\n");
        input.extend_from_slice(b"{\"name\":\"c\"}");

        let (tx, mut rx) = create_pipeline_channel(10);
        let forwarded = read_events(input.as_slice(), &tx).await.unwrap();
        drop(tx);

        assert_eq!(forwarded, 3);
        let first = rx.recv().await.unwrap();
        assert_eq!(first.name, "a");
        assert_eq!(first.values["n"], Value::Int(1));
        assert_eq!(rx.recv().await.unwrap().name, "b");
        assert_eq!(rx.recv().await.unwrap().name, "c");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_read_stops_when_pipeline_closed() {
        let input = b"{\"name\":\"a\"}\n{\"name\":\"b\"}\n";
        let (tx, rx) = create_pipeline_channel(10);
        drop(rx);

        let forwarded = read_events(&input[..], &tx).await.unwrap();
        assert_eq!(forwarded, 0);
    }

    #[tokio::test]
    async fn test_write_one_line_per_event() {
        let (tx, rx) = create_pipeline_channel(10);
        tx.send(EventMsg::new("a", 1).with_value("id", "-1")).await.unwrap();
        tx.send(EventMsg::new("b", 2).with_tag("host", "r1")).await.unwrap();
        drop(tx);

        let mut out = Vec::new();
        write_events(rx, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: EventMsg = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.values["id"], Value::from("-1"));
        let second: EventMsg = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.tags["host"], "r1");
    }
}
