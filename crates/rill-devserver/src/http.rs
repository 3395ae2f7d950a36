//! Minimal HTTP/1.1 host for the dev server.
//!
//! One request per connection, `connection: close`. Streaming bodies use
//! chunked transfer encoding with one HTTP chunk per pipeline flush, so
//! flush boundaries survive all the way to the client.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use futures::StreamExt;
use rill_core::{Method, RequestContext};
use rill_render::Page;
use rill_server::{Body, Pipeline, Response};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::{TcpListener, TcpStream};

/// Route table: path to registered page.
pub type Routes = HashMap<&'static str, Arc<Page>>;

/// Accept loop. Each connection is served on its own task.
pub async fn serve(
    listener: TcpListener,
    pipeline: Arc<Pipeline>,
    routes: Arc<Routes>,
) -> Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let pipeline = Arc::clone(&pipeline);
        let routes = Arc::clone(&routes);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, pipeline, routes).await {
                eprintln!("connection error ({peer}): {e:#}");
            }
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    pipeline: Arc<Pipeline>,
    routes: Arc<Routes>,
) -> Result<()> {
    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut writer = BufWriter::new(write_half);

    let ctx = read_request(&mut reader).await?;

    match routes.get(ctx.path.as_str()) {
        Some(page) => {
            let page = Arc::clone(page);
            match pipeline.handle(ctx, page).await {
                Ok(response) => write_response(&mut writer, response).await?,
                Err(e) => write_plain(&mut writer, 500, &format!("render error: {e}")).await?,
            }
        }
        None => write_plain(&mut writer, 404, "not found").await?,
    }

    writer.flush().await?;
    Ok(())
}

/// Parse the request line and headers into a [`RequestContext`].
async fn read_request<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<RequestContext> {
    let mut line = String::new();
    reader.read_line(&mut line).await?;

    let mut parts = line.split_whitespace();
    let method = parts
        .next()
        .and_then(Method::parse)
        .context("unsupported method in request line")?;
    let target = parts.next().context("missing target in request line")?;

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, ""),
    };

    let mut ctx = RequestContext::new(method, path).with_query_string(query);

    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).await? == 0 {
            break;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            ctx = ctx.with_header(name.trim(), value.trim());
        }
    }

    Ok(ctx)
}

async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: Response) -> Result<()> {
    let mut head = format!("HTTP/1.1 {} {}\r\n", response.status, reason(response.status));
    for (name, value) in response.headers() {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str("connection: close\r\n");

    match response.body {
        Body::Buffered(body) => {
            head.push_str(&format!("content-length: {}\r\n\r\n", body.len()));
            writer.write_all(head.as_bytes()).await?;
            writer.write_all(body.as_bytes()).await?;
            writer.flush().await?;
        }
        Body::Streaming(mut rx) => {
            head.push_str("transfer-encoding: chunked\r\n\r\n");
            writer.write_all(head.as_bytes()).await?;
            writer.flush().await?;

            while let Some(chunk) = rx.next().await {
                writer
                    .write_all(format!("{:x}\r\n", chunk.len()).as_bytes())
                    .await?;
                writer.write_all(&chunk).await?;
                writer.write_all(b"\r\n").await?;
                writer.flush().await?;
            }
            writer.write_all(b"0\r\n\r\n").await?;
            writer.flush().await?;
        }
    }

    Ok(())
}

async fn write_plain<W: AsyncWrite + Unpin>(
    writer: &mut W,
    status: u16,
    message: &str,
) -> Result<()> {
    let head = format!(
        "HTTP/1.1 {} {}\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
        status,
        reason(status),
        message.len(),
    );
    writer.write_all(head.as_bytes()).await?;
    writer.write_all(message.as_bytes()).await?;
    Ok(())
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc;
    use futures::SinkExt;

    #[tokio::test]
    async fn test_read_request_parses_target_and_headers() {
        let raw = b"GET /streaming?__flight__=1 HTTP/1.1\r\nUser-Agent: curl/8.0\r\n\r\n";
        let mut reader = BufReader::new(&raw[..]);

        let ctx = read_request(&mut reader).await.unwrap();
        assert_eq!(ctx.path, "/streaming");
        assert!(ctx.has_query_flag("__flight__"));
        assert_eq!(ctx.user_agent(), Some("curl/8.0"));
    }

    #[tokio::test]
    async fn test_read_request_rejects_unknown_method() {
        let raw = b"BREW / HTTP/1.1\r\n\r\n";
        let mut reader = BufReader::new(&raw[..]);
        assert!(read_request(&mut reader).await.is_err());
    }

    #[tokio::test]
    async fn test_buffered_response_uses_content_length() {
        let response = Response::new(200, Body::Buffered("<html></html>".to_string()))
            .with_header("content-type", "text/html; charset=utf-8");

        let mut out = Vec::new();
        write_response(&mut out, response).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("content-length: 13\r\n"));
        assert!(text.ends_with("<html></html>"));
    }

    #[tokio::test]
    async fn test_streaming_response_frames_each_flush() {
        let (mut tx, rx) = mpsc::channel(4);
        tx.send(b"abc".to_vec()).await.unwrap();
        tx.send(b"defgh".to_vec()).await.unwrap();
        drop(tx);

        let response = Response::new(200, Body::Streaming(rx));
        let mut out = Vec::new();
        write_response(&mut out, response).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("transfer-encoding: chunked\r\n"));
        assert!(text.contains("3\r\nabc\r\n"));
        assert!(text.contains("5\r\ndefgh\r\n"));
        assert!(text.ends_with("0\r\n\r\n"));
    }
}
