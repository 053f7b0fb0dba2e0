use crate::Context;
use crate::classify::file::classify_file;
use crate::models::{FailedFile, FailureReason, Outcome};
use crate::scan::ScannedFile;
use async_stream::stream;
use futures::stream::FuturesUnordered;
use futures::{Stream, StreamExt};

/// Progress events emitted by [`classify_stream`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started), exactly once.
/// 2. [`DiscoveryComplete`](Self::DiscoveryComplete), exactly once, with the
///    number of files to classify.
/// 3. [`Classified`](Self::Classified), once per file, in completion order.
/// 4. [`Complete`](Self::Complete), exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyEvent {
    Started,
    DiscoveryComplete(u64),
    Classified(Outcome),
    Complete,
}

/// Streams a [`ClassifyEvent`] for every file, classifying up to
/// [`Context::workers`] files at a time on Tokio's blocking pool.
///
/// Dropping the stream abandons the batch; files still being classified are
/// discarded and never reported.
pub fn classify_stream<'a>(ctx: &'a Context, files: Vec<ScannedFile>) -> impl Stream<Item = ClassifyEvent> + 'a {
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        yield ClassifyEvent::Started;
        // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
        yield ClassifyEvent::DiscoveryComplete(u64::try_from(files.len()).unwrap_or(0));

        let mut pending = files.into_iter().map(|file| classify_blocking(ctx.clone(), file));
        let mut processing = FuturesUnordered::new();
        processing.extend(pending.by_ref().take(ctx.workers.max(1)));
        while let Some(outcome) = processing.next().await {
            yield ClassifyEvent::Classified(outcome);
            if let Some(next) = pending.next() {
                processing.push(next);
            }
        }

        yield ClassifyEvent::Complete;
    })
}

async fn classify_blocking(ctx: Context, file: ScannedFile) -> Outcome {
    let file_path = file.path.clone();
    match tokio::task::spawn_blocking(move || classify_file(&ctx, &file)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(path = %file_path.display(), error = %e, "Classification worker aborted");
            Outcome::Failed(FailedFile {
                file_path,
                reason: FailureReason::Aborted,
            })
        },
    }
}
