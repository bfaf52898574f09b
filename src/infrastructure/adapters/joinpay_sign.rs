//! 汇聚支付报文签名。
//! 约定：剔除hmac字段，按键名字节序升序取值无分隔拼接，
//! 尾部附加商户密钥后取MD5十六进制摘要。出站签名与入站验签使用同一规则。

use std::collections::BTreeMap;

/// 签名字段名，自身不参与摘要计算
pub const HMAC_FIELD: &str = "hmac";

/// 计算报文签名
pub fn sign(fields: &BTreeMap<String, String>, merchant_key: &str) -> String {
    let mut plain = String::new();
    for (key, value) in fields {
        if key == HMAC_FIELD {
            continue;
        }
        plain.push_str(value);
    }
    plain.push_str(merchant_key);
    hex::encode(md5::compute(plain.as_bytes()).0)
}

/// 验证报文签名，hmac缺失时返回false
pub fn verify(fields: &BTreeMap<String, String>, merchant_key: &str) -> bool {
    match fields.get(HMAC_FIELD) {
        Some(supplied) => constant_time_eq(&sign(fields, merchant_key), supplied),
        None => false,
    }
}

/// 常量时间字符串比较 (防止时序攻击)
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (byte_a, byte_b) in a.bytes().zip(b.bytes()) {
        result |= byte_a ^ byte_b;
    }

    result == 0
}
