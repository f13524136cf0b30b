//! Startup connectivity check against the mock upstream

mod common;

use clap::Parser;
use deepseek_gateway::{config::Args, upstream};

use common::mock_upstream::{Behavior, MockUpstream, closed_port_url};

fn args_for(base_url: &str) -> Args {
    Args::try_parse_from([
        "deepseek-gateway",
        "--api-key",
        "sk-test",
        "--base-url",
        base_url,
        "--upstream-timeout",
        "2",
    ])
    .unwrap()
}

#[tokio::test]
async fn test_connect_succeeds_when_models_listed() {
    let mock = MockUpstream::start(Behavior::Reply).await;

    let client = upstream::connect(&args_for(&mock.base_url)).await;

    let client = client.expect("client should initialize");
    assert_eq!(client.model(), "deepseek-chat");
}

#[tokio::test]
async fn test_connect_is_absent_when_key_rejected() {
    let mock = MockUpstream::start(Behavior::Unauthorized).await;

    assert!(upstream::connect(&args_for(&mock.base_url)).await.is_none());
}

#[tokio::test]
async fn test_connect_is_absent_when_unreachable() {
    let base_url = closed_port_url().await;

    assert!(upstream::connect(&args_for(&base_url)).await.is_none());
}
