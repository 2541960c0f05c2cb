//! Integration tests for the TCP transport.
//!
//! These spin up a real listener on an OS-assigned port and talk to it
//! with a plain `TcpStream`, the same way `nc` would.

#[cfg(feature = "tcp")]
mod tcp {
    use std::time::Duration;

    use horde_transport::{Connection, MAX_LINE_LEN, TcpTransport, Transport, TransportError};
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpStream;

    async fn pair() -> (horde_transport::TcpConnection, TcpStream) {
        let mut transport = TcpTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("should have an address");

        let server = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let client = TcpStream::connect(addr).await.expect("client should connect");
        let conn = server.await.expect("task should complete");
        (conn, client)
    }

    #[tokio::test]
    async fn test_tcp_lines_flow_both_ways() {
        let (conn, client) = pair().await;
        assert!(conn.id().into_inner() > 0);

        let (read, mut write) = client.into_split();
        let mut client_lines = BufReader::new(read).lines();

        conn.send(b"# hello\n").await.expect("send should succeed");
        let line = client_lines.next_line().await.unwrap();
        assert_eq!(line.as_deref(), Some("# hello"));

        write.write_all(b"SHOOT 1 2\r\nSTART ivan\n").await.unwrap();
        assert_eq!(conn.recv().await.unwrap(), Some(b"SHOOT 1 2".to_vec()));
        assert_eq!(conn.recv().await.unwrap(), Some(b"START ivan".to_vec()));
    }

    #[tokio::test]
    async fn test_tcp_recv_returns_none_on_client_close() {
        let (conn, client) = pair().await;
        drop(client);

        let got = tokio::time::timeout(Duration::from_secs(2), conn.recv())
            .await
            .expect("recv should not hang");
        assert!(matches!(got, Ok(None)));
    }

    #[tokio::test]
    async fn test_tcp_last_line_without_newline_is_delivered() {
        let (conn, mut client) = pair().await;
        client.write_all(b"JOIN woods").await.unwrap();
        client.shutdown().await.unwrap();

        assert_eq!(conn.recv().await.unwrap(), Some(b"JOIN woods".to_vec()));
        assert!(matches!(conn.recv().await, Ok(None)));
    }

    #[tokio::test]
    async fn test_tcp_rejects_oversized_line() {
        let (conn, mut client) = pair().await;
        let junk = vec![b'x'; MAX_LINE_LEN * 2];
        client.write_all(&junk).await.unwrap();

        let got = conn.recv().await;
        assert!(matches!(got, Err(TransportError::ReceiveFailed(_))));
    }

    #[tokio::test]
    async fn test_tcp_close_ends_client_stream() {
        let (conn, mut client) = pair().await;
        conn.send(b"# bye\n").await.unwrap();
        conn.close().await.expect("close should succeed");

        let mut rest = String::new();
        tokio::time::timeout(Duration::from_secs(2), client.read_to_string(&mut rest))
            .await
            .expect("client should see EOF")
            .unwrap();
        assert_eq!(rest, "# bye\n");
    }

    #[tokio::test]
    async fn test_tcp_accept_after_shutdown_fails() {
        let mut transport = TcpTransport::bind("127.0.0.1:0").await.unwrap();
        transport.shutdown().await.unwrap();
        assert!(matches!(
            transport.accept().await,
            Err(TransportError::Shutdown)
        ));
    }
}
