//! `notif-inspect`: read newline-delimited JSON frames from stdin and report
//! how each one matches the protocol contract.

use notif_protocol::config::Config;
use notif_protocol::{decode_frame, Frame, ServerResponse, TopicPattern};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let summary = inspect(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        config.strict,
    )
    .await?;

    info!(
        decoded = summary.decoded,
        unknown = summary.unknown,
        rejected = summary.rejected,
        "done"
    );
    Ok(())
}

/// Per-run frame counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Summary {
    decoded: u64,
    unknown: u64,
    rejected: u64,
}

/// Decode every non-blank line of `reader`, writing one report line per frame
/// to `writer`. In strict mode the first undecodable line ends the run with an
/// error; otherwise it is counted as rejected and skipped.
async fn inspect<R, W>(reader: R, mut writer: W, strict: bool) -> anyhow::Result<Summary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut summary = Summary::default();
    let mut line_no = 0u64;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        match decode_frame(text) {
            Ok(frame) => {
                summary.decoded += 1;
                if frame.is_unknown() {
                    summary.unknown += 1;
                }
                writer
                    .write_all(format!("{}\n", describe(line_no, &frame)).as_bytes())
                    .await?;
            }
            Err(e) if strict => {
                writer.flush().await?;
                return Err(anyhow::anyhow!("line {}: {}", line_no, e));
            }
            Err(e) => {
                summary.rejected += 1;
                warn!(line = line_no, error = %e, "undecodable frame");
            }
        }
    }
    writer.flush().await?;

    Ok(summary)
}

/// One tab-separated report line: line number, direction, discriminant, tag
/// and an optional note.
fn describe(line_no: u64, frame: &Frame) -> String {
    let direction = match frame {
        Frame::Server(_) => "server",
        Frame::Bus(_) => "bus",
        Frame::Client(_) => "client",
    };
    let mut out = format!(
        "{}\t{}\t{}\t{}",
        line_no,
        direction,
        frame.discriminant(),
        frame.tag()
    );

    let note = match frame {
        _ if frame.is_unknown() => Some("unknown".to_string()),
        Frame::Server(ServerResponse::Notification(event)) => {
            let patterns: Vec<String> = TopicPattern::carrying(event.event_type())
                .iter()
                .map(|p| format!("{:?}", p))
                .collect();
            Some(format!("{} via {}", event.event_type(), patterns.join(",")))
        }
        _ => None,
    };
    if let Some(note) = note {
        out.push('\t');
        out.push_str(&note);
    }
    out
}
