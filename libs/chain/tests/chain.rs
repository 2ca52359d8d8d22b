#[cfg(test)]
mod tests {
    use alloy::transports::http::reqwest::Url;
    use chain::rpc::NodeClient;
    use eyre::Result;

    #[tokio::test]
    async fn test_unreachable_node_reports_error() -> Result<()> {
        // Nothing listens on port 1.
        let node_client = NodeClient::new(Url::parse("http://127.0.0.1:1")?);

        assert!(node_client.get_latest_block_number().await.is_err());
        assert!(node_client.get_block_timestamp(0).await.is_err());

        Ok(())
    }
}
