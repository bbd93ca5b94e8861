/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Seq2SeqConfig 的解析与校验测试
 */

use super::small_config;
use crate::assert_err;
use crate::errors::ModelError;
use crate::models::{AttentionType, CellType, Seq2SeqConfig};

const JSON: &str = r#"{
    "cell": "lstm",
    "emb_size": 16,
    "hidden_size": 32,
    "enc_num_layers": 2,
    "dec_num_layers": 2,
    "dropout": 0.3,
    "bidirectional": true,
    "src_vocab_size": 100,
    "tgt_vocab_size": 120,
    "attention": "None"
}"#;

#[test]
fn test_parse_json() -> Result<(), ModelError> {
    let config = Seq2SeqConfig::from_json_str(JSON)?;
    assert_eq!(config.cell, CellType::Lstm);
    assert_eq!(config.attention, AttentionType::None);
    assert_eq!(config.hidden_size, 32);
    assert_eq!(config.pool_size, 1);
    assert_eq!(config.num_directions(), 2);
    Ok(())
}

#[test]
fn test_json_round_trip() -> Result<(), ModelError> {
    let config = small_config();
    let json = config.to_json()?;
    assert!(json.contains("\"luong_gate\""));
    assert!(json.contains("\"gru\""));
    assert_eq!(Seq2SeqConfig::from_json_str(&json)?, config);
    Ok(())
}

#[test]
fn test_parse_type_names() {
    assert_eq!("none".parse::<AttentionType>(), Ok(AttentionType::None));
    assert_eq!("None".parse::<AttentionType>(), Ok(AttentionType::None));
    assert_eq!("bahdanau".parse::<AttentionType>(), Ok(AttentionType::Bahdanau));
    assert_eq!("luong".parse::<AttentionType>(), Ok(AttentionType::Luong));
    assert_eq!("luong_gate".parse::<AttentionType>(), Ok(AttentionType::LuongGate));
    assert_eq!("gru".parse::<CellType>(), Ok(CellType::Gru));
    assert_eq!("lstm".parse::<CellType>(), Ok(CellType::Lstm));
    assert_err!(
        "dot".parse::<AttentionType>(),
        ModelError::ConfigurationError("未知的注意力类型：dot")
    );
    assert_err!(
        "rnn".parse::<CellType>(),
        ModelError::ConfigurationError("未知的循环单元类型：rnn")
    );
}

#[test]
fn test_unknown_attention_in_json_fails() {
    let json = JSON.replace("\"None\"", "\"dot\"");
    assert_err!(
        Seq2SeqConfig::from_json_str(&json),
        ModelError::ConfigurationError(msg) if msg.contains("未知的注意力类型")
    );
}

#[test]
fn test_value_ranges() {
    let mut config = small_config();
    config.dropout = 1.0;
    assert_err!(config.validate(), ModelError::ConfigurationError(msg) if msg.contains("dropout"));
    config.dropout = -0.1;
    assert_err!(config.validate(), ModelError::ConfigurationError(msg) if msg.contains("dropout"));

    let mut config = small_config();
    config.hidden_size = 0;
    assert_err!(config.validate(), ModelError::ConfigurationError("hidden_size须大于0"));

    let mut config = small_config();
    config.attention = AttentionType::Bahdanau;
    config.pool_size = 0;
    assert_err!(config.validate(), ModelError::ConfigurationError("pool_size须大于0"));
    // luong_gate 不使用 pool_size
    config.attention = AttentionType::LuongGate;
    assert!(config.validate().is_ok());
}

#[test]
fn test_layer_count_policy() {
    let check = |cell, enc, dec, bidirectional| {
        let mut config = small_config();
        config.cell = cell;
        config.enc_num_layers = enc;
        config.dec_num_layers = dec;
        config.bidirectional = bidirectional;
        config.validate()
    };
    // 编码器层数不能少于解码器
    assert_err!(
        check(CellType::Gru, 1, 2, true),
        ModelError::ConfigurationError("enc_num_layers(1)不能小于dec_num_layers(2)")
    );
    // GRU：取前 dec 个条目
    assert!(check(CellType::Gru, 2, 2, true).is_ok());
    assert!(check(CellType::Gru, 3, 1, false).is_ok());
    assert!(check(CellType::Gru, 2, 2, false).is_ok());
    // LSTM：步长 2 取出 ceil(enc * D / 2) 个条目，须恰好等于 dec
    assert!(check(CellType::Lstm, 2, 2, true).is_ok());
    assert!(check(CellType::Lstm, 3, 3, true).is_ok());
    assert!(check(CellType::Lstm, 2, 1, false).is_ok());
    assert!(check(CellType::Lstm, 3, 2, false).is_ok());
    assert_err!(
        check(CellType::Lstm, 3, 2, true),
        ModelError::ConfigurationError(msg) if msg.contains("LSTM")
    );
    assert_err!(
        check(CellType::Lstm, 2, 2, false),
        ModelError::ConfigurationError(msg) if msg.contains("LSTM")
    );
}

#[test]
fn test_from_missing_file() {
    assert_err!(
        Seq2SeqConfig::from_json_file("/nonexistent/su_seq2seq/config.json"),
        ModelError::Io(_)
    );
}
