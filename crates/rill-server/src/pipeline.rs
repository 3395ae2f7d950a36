//! Request handling: classify, render, stream.

use std::sync::Arc;

use futures::channel::mpsc;
use futures::{SinkExt, StreamExt};
use rill_core::{RenderError, RequestContext, RillConfig, RuntimeMode, TimingContext};
use rill_lint::{console_warn_script, lint_head};
use rill_observability::{MetricsCollector, StructuredLogger};
use rill_render::{
    boundary_anchor_id, error_html, flight_rows, html_escape_attr, inline_state_script,
    render_completion, render_fallback, resolution_stream, resolve_to_completion, Page, PagePart,
    FLIGHT_CONTENT_TYPE, FLIGHT_QUERY_MARKER, HYDRATION_RUNTIME,
};
use rill_streaming::{BoundaryLedger, ChunkSink, FlushPolicy, Shell};
use rill_ua::{BotDetector, Classification};
use serde_json::json;

use crate::etag::etag_header;
use crate::response::{Body, Response, TEXT_HTML};

/// The rill request pipeline.
///
/// `handle` must run inside a tokio runtime: streaming responses are
/// driven by a spawned render task that feeds the body channel while the
/// caller already holds the response headers.
pub struct Pipeline {
    config: RillConfig,
    detector: BotDetector,
}

impl Pipeline {
    /// Create a pipeline with the default bot detector.
    pub fn new(config: RillConfig) -> Self {
        Self {
            config,
            detector: BotDetector::new(),
        }
    }

    /// Override the bot detector.
    pub fn with_detector(mut self, detector: BotDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &RillConfig {
        &self.config
    }

    /// Handle one request against a registered page.
    pub async fn handle(
        &self,
        ctx: RequestContext,
        page: Arc<Page>,
    ) -> Result<Response, RenderError> {
        let logger = StructuredLogger::new(ctx.request_id.clone())
            .with_page(page.component())
            .with_route(&ctx.path);

        let mut metrics = MetricsCollector::new(ctx.request_id.clone());
        metrics.set_page(page.component());
        metrics.set_route(&ctx.path);

        if ctx.has_query_flag(FLIGHT_QUERY_MARKER) {
            return Ok(self.handle_flight(&page, &logger));
        }

        match self.detector.classify(ctx.user_agent()) {
            Classification::Bot { signature } => {
                logger.info_with(
                    "crawler detected, streaming disabled",
                    &[("signature", json!(signature))],
                );
                self.render_buffered(page, &logger, metrics).await
            }
            Classification::Human => Ok(self.render_streaming(page, logger, metrics)),
        }
    }

    /// Flight path: a row-based component payload instead of HTML.
    fn handle_flight(&self, page: &Page, logger: &StructuredLogger) -> Response {
        let rows = flight_rows(page);
        logger.info_with("flight response", &[("rows", json!(rows.len()))]);

        let (mut tx, rx) = mpsc::channel(self.config.stream.channel_capacity);
        tokio::spawn(async move {
            for row in rows {
                if tx.send(row.into_bytes()).await.is_err() {
                    break;
                }
            }
        });

        Response::new(200, Body::Streaming(rx)).with_header("content-type", FLIGHT_CONTENT_TYPE)
    }

    /// Crawler path: everything resolved, exactly one flush.
    async fn render_buffered(
        &self,
        page: Arc<Page>,
        logger: &StructuredLogger,
        mut metrics: MetricsCollector,
    ) -> Result<Response, RenderError> {
        metrics.set_bot(true);

        let events = resolve_to_completion(&page).await;

        // No hydration runtime: the document ships fully resolved.
        let shell = Shell::new(page.head().render());
        let mut body = shell.render_opening();

        let mut index = 0usize;
        for part in page.parts() {
            match part {
                PagePart::Html(html) => body.push_str(html),
                PagePart::Boundary(boundary) => {
                    match &events[index].result {
                        Ok(resolved) => {
                            body.push_str(&format!(
                                r#"<div id="{}" data-rill-boundary="{}">{}</div>"#,
                                boundary_anchor_id(index),
                                html_escape_attr(&boundary.name),
                                resolved.html,
                            ));
                            if let Some(state) = &resolved.state {
                                body.push_str(&inline_state_script(&boundary.name, state));
                            }
                            metrics.record_boundary(&boundary.name, resolved.html.len(), false);
                        }
                        Err(e) => {
                            logger.error_with(
                                "boundary failed",
                                &[
                                    ("boundary", json!(boundary.name)),
                                    ("error", json!(e.to_string())),
                                ],
                            );
                            body.push_str(&error_html(&boundary.name, &e.to_string()));
                            metrics.record_boundary(&boundary.name, 0, true);
                        }
                    }
                    index += 1;
                }
            }
        }

        if self.config.dev {
            for warning in lint_head(page.head()) {
                logger.warn(&warning.message);
                body.push_str(&console_warn_script(&warning));
            }
        }

        body.push_str(&shell.render_closing());

        metrics.record_flush(body.len());
        let m = metrics.finalize(200);
        logger.info_with(
            "buffered response complete",
            &[("flushes", json!(m.flush_count)), ("bytes", json!(m.bytes_sent))],
        );

        let validator = etag_header(&body);
        let mut response =
            Response::new(200, Body::Buffered(body)).with_header("content-type", TEXT_HTML);
        if self.config.runtime == RuntimeMode::Server {
            response = response.with_header(validator.0, validator.1);
        }
        Ok(response)
    }

    /// Streaming path: shell first, resolution chunks per the configured
    /// flush policy, then the closing chunk. Never carries a cache
    /// validator.
    fn render_streaming(
        &self,
        page: Arc<Page>,
        logger: StructuredLogger,
        metrics: MetricsCollector,
    ) -> Response {
        let shell = Shell::new(page.head().render()).with_script(HYDRATION_RUNTIME);

        let mut shell_chunk = shell.render_opening();
        let mut index = 0usize;
        for part in page.parts() {
            match part {
                PagePart::Html(html) => shell_chunk.push_str(html),
                PagePart::Boundary(boundary) => {
                    shell_chunk.push_str(&render_fallback(
                        index,
                        &boundary.name,
                        &boundary.fallback,
                    ));
                    index += 1;
                }
            }
        }

        let mut closing_chunk = String::new();
        if self.config.dev {
            for warning in lint_head(page.head()) {
                logger.warn(&warning.message);
                closing_chunk.push_str(&console_warn_script(&warning));
            }
        }
        closing_chunk.push_str(&shell.render_closing());

        let policy = if self.config.stream.flush_after_boundary {
            FlushPolicy::AfterEachBoundary
        } else {
            FlushPolicy::AfterShell
        };

        let (tx, rx) = mpsc::channel(self.config.stream.channel_capacity);
        tokio::spawn(drive_stream(
            page,
            shell_chunk,
            closing_chunk,
            policy,
            tx,
            logger,
            metrics,
        ));

        Response::new(200, Body::Streaming(rx)).with_header("content-type", TEXT_HTML)
    }
}

/// Render task feeding the body channel of one streaming response.
async fn drive_stream(
    page: Arc<Page>,
    shell_chunk: String,
    closing_chunk: String,
    policy: FlushPolicy,
    tx: mpsc::Sender<Vec<u8>>,
    logger: StructuredLogger,
    mut metrics: MetricsCollector,
) {
    let mut sink = ChunkSink::new(tx, TimingContext::new());

    let result = async {
        sink.send_shell(&shell_chunk).await?;
        metrics.record_flush(shell_chunk.len());

        let mut ledger = BoundaryLedger::new();
        for boundary in page.boundaries() {
            ledger.register(&boundary.name);
        }

        let mut deferred = String::new();
        let mut events = resolution_stream(&page);
        while let Some(event) = events.next().await {
            ledger.resolve(&event.name)?;

            let errored = event.result.is_err();
            let chunk = match event.result {
                Ok(resolved) => {
                    let mut chunk = render_completion(event.index, &resolved.html);
                    if let Some(state) = &resolved.state {
                        chunk.push_str(&inline_state_script(&event.name, state));
                    }
                    chunk
                }
                Err(e) => {
                    logger.error_with(
                        "boundary failed",
                        &[
                            ("boundary", json!(event.name)),
                            ("error", json!(e.to_string())),
                        ],
                    );
                    render_completion(event.index, &error_html(&event.name, &e.to_string()))
                }
            };

            metrics.record_boundary(&event.name, chunk.len(), errored);
            if policy.flush_after_boundary() {
                sink.send_boundary(&event.name, &chunk).await?;
                metrics.record_flush(chunk.len());
            } else {
                deferred.push_str(&chunk);
            }
        }
        debug_assert!(ledger.all_resolved());

        let closing = deferred + &closing_chunk;
        let closing_len = closing.len();
        sink.send_raw(closing.into_bytes()).await?;
        metrics.record_flush(closing_len);
        sink.complete()?;

        Ok::<(), RenderError>(())
    }
    .await;

    match result {
        Ok(()) => {
            let m = metrics.finalize(200);
            logger.info_with(
                "stream complete",
                &[
                    ("flushes", json!(m.flush_count)),
                    ("bytes", json!(m.bytes_sent)),
                    ("boundaries", json!(m.boundaries.len())),
                ],
            );
        }
        // A closed receiver is the usual cause here (client went away).
        Err(e) => logger.warn(&format!("stream aborted: {e}")),
    }
}
