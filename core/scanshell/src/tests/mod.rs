//! テスト用スタブと、複数ユースケースにまたがるシナリオテスト

pub(crate) mod stubs;
