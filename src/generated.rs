#![allow(
    clippy::doc_markdown,
    clippy::use_self,
    clippy::enum_variant_names,
    clippy::large_enum_variant
)]

pub mod envoy;
