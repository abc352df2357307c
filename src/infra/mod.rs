pub mod kuma_client;
