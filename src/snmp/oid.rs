use anyhow::{Context, Result};
use snmp2::Oid;

/// ifDescr
pub const IF_DESCR: &str = "1.3.6.1.2.1.2.2.1.2";
/// ifType
pub const IF_TYPE: &str = "1.3.6.1.2.1.2.2.1.3";
/// ifOperStatus
pub const IF_OPER_STATUS: &str = "1.3.6.1.2.1.2.2.1.8";
/// dot1dTpFdbPort (BRIDGE-MIB)
pub const MAC_TABLE_BRIDGE: &str = "1.3.6.1.2.1.17.4.3.1.2";
/// dot1qTpFdbPort (Q-BRIDGE-MIB)
pub const MAC_TABLE_QBRIDGE: &str = "1.3.6.1.2.1.17.7.1.2.2.1.2";

/// "1.3.6.1" -> [1, 3, 6, 1]; ведущая точка допускается
pub fn oid_components(s: &str) -> Result<Vec<u64>> {
    let parts: Result<Vec<u64>, _> = s
        .trim()
        .split('.')
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<u64>())
        .collect();

    parts.context(format!("Невалидный OID: {}", s))
}

pub fn format_oid(parts: &[u64]) -> String {
    parts
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

pub fn to_snmp_oid(parts: &[u64]) -> Result<Oid<'static>> {
    Oid::from(parts).map_err(|e| anyhow::anyhow!("Не удалось создать Oid: {:?}", e))
}
