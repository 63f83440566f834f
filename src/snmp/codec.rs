//! Перевод сырых OID и значений в доменные типы.
//!
//! Все функции чистые. Ошибка разбора одной строки возвращается как
//! [`DecodeError`], решение пропустить строку принимает вызывающий код.

use crate::error::DecodeError;
use crate::models::{MacObservation, System};

use super::Varbind;

/// Якорь dot1qTpFdbPort внутри OID, за ним идёт VLAN
const VLAN_ANCHOR: [&str; 4] = ["2", "2", "1", "2"];

const MAC_OCTETS: usize = 6;

/// Отрезает префикс таблицы и разбирает остаток как ifIndex
pub fn parse_index(oid: &str, prefix: &str) -> Result<u32, DecodeError> {
    let rest = strip_root(oid, prefix)?;
    rest.parse::<u32>().map_err(|_| DecodeError::BadIndex {
        oid: oid.to_string(),
    })
}

/// Остаток OID после `prefix.`; ведущая точка игнорируется
fn strip_root<'a>(oid: &'a str, prefix: &str) -> Result<&'a str, DecodeError> {
    oid.strip_prefix('.')
        .unwrap_or(oid)
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('.'))
        .ok_or_else(|| DecodeError::PrefixMismatch {
            oid: oid.to_string(),
            prefix: prefix.to_string(),
        })
}

/// "0.1.2.3.4.5" -> "00:01:02:03:04:05"
pub fn decimal_mac_to_hex(dotted: &str) -> Result<String, DecodeError> {
    let parts: Vec<&str> = dotted.split('.').collect();
    if parts.len() != MAC_OCTETS {
        return Err(DecodeError::MacLength {
            raw: dotted.to_string(),
            parts: parts.len(),
        });
    }

    let octets = parts
        .iter()
        .map(|p| {
            p.parse::<u8>().map_err(|_| DecodeError::MacOctet {
                raw: dotted.to_string(),
                octet: p.to_string(),
            })
        })
        .collect::<Result<Vec<u8>, _>>()?;

    Ok(octets
        .iter()
        .map(|o| format!("{:02x}", o))
        .collect::<Vec<_>>()
        .join(":"))
}

/// VLAN из OID MAC-таблицы. Для generic всегда 0.
///
/// Позиция якоря зависит от ширины таблицы, поэтому ищем его по компонентам,
/// а не по фиксированному смещению.
pub fn extract_vlan(oid: &str, system: System) -> u16 {
    if system != System::Unifi {
        return 0;
    }

    let parts: Vec<&str> = oid.trim_start_matches('.').split('.').collect();
    parts
        .windows(VLAN_ANCHOR.len() + 1)
        .find(|w| w[..VLAN_ANCHOR.len()] == VLAN_ANCHOR)
        .map(|w| w[VLAN_ANCHOR.len()].parse::<u16>().unwrap_or(0))
        .unwrap_or(0)
}

/// Десятичная запись MAC из OID строки таблицы форвардинга
pub fn mac_suffix(oid: &str, system: System) -> Result<String, DecodeError> {
    let rest = strip_root(oid, system.mac_table_root())?;
    match system {
        // Индекс dot1dTpFdbAddress - ровно 6 октетов, хвост после них не нужен
        System::Generic => Ok(rest.split('.').take(MAC_OCTETS).collect::<Vec<_>>().join(".")),
        // Первый компонент - VLAN, MAC занимает остальные
        System::Unifi => Ok(rest
            .split_once('.')
            .map(|(_, mac)| mac)
            .unwrap_or(rest)
            .to_string()),
    }
}

/// Разбирает одну строку MAC-таблицы: значение - ifIndex, OID - VLAN и MAC
pub fn decode_mac_row(row: &Varbind, system: System) -> Result<MacObservation, DecodeError> {
    let port_index = row
        .value
        .as_i64()
        .and_then(|i| u32::try_from(i).ok())
        .ok_or_else(|| DecodeError::NotInteger {
            oid: row.oid.clone(),
            value: row.value.to_string(),
        })?;

    let vlan = extract_vlan(&row.oid, system);
    let mac = decimal_mac_to_hex(&mac_suffix(&row.oid, system)?)?;

    Ok(MacObservation {
        port_index,
        vlan,
        mac,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snmp::SnmpValue;
    use crate::snmp::oid::{IF_DESCR, IF_OPER_STATUS};

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("1.3.6.1.2.1.2.2.1.2.3", IF_DESCR), Ok(3));
        assert_eq!(parse_index(".1.3.6.1.2.1.2.2.1.8.10101", IF_OPER_STATUS), Ok(10101));
    }

    #[test]
    fn test_parse_index_soft_failures() {
        assert!(matches!(
            parse_index("1.3.6.1.2.1.2.2.1.2.3.1", IF_DESCR),
            Err(DecodeError::BadIndex { .. })
        ));
        assert!(matches!(
            parse_index("1.3.6.1.2.1.2.2.1.2", IF_DESCR),
            Err(DecodeError::PrefixMismatch { .. })
        ));
        assert!(matches!(
            parse_index("1.3.6.1.2.1.2.2.1.3.3", IF_DESCR),
            Err(DecodeError::PrefixMismatch { .. })
        ));
        assert!(parse_index("1.3.6.1.2.1.2.2.1.2.-1", IF_DESCR).is_err());
    }

    #[test]
    fn test_decimal_mac_to_hex() {
        assert_eq!(decimal_mac_to_hex("0.1.2.3.4.5").unwrap(), "00:01:02:03:04:05");
        assert_eq!(
            decimal_mac_to_hex("252.236.218.16.171.255").unwrap(),
            "fc:ec:da:10:ab:ff"
        );
    }

    #[test]
    fn test_decimal_mac_to_hex_every_byte() {
        for b in 0u16..=255 {
            let dotted = format!("{b}.{b}.{b}.{b}.{b}.{b}");
            let hex = format!("{:02x}", b);
            let expected = vec![hex.as_str(); 6].join(":");
            assert_eq!(decimal_mac_to_hex(&dotted).unwrap(), expected);
        }
    }

    #[test]
    fn test_decimal_mac_to_hex_rejects() {
        assert!(matches!(
            decimal_mac_to_hex("1.2.3.4.5"),
            Err(DecodeError::MacLength { parts: 5, .. })
        ));
        assert!(matches!(
            decimal_mac_to_hex("1.2.3.4.5.6.7"),
            Err(DecodeError::MacLength { parts: 7, .. })
        ));
        assert!(matches!(
            decimal_mac_to_hex("1.2.x.4.5.6"),
            Err(DecodeError::MacOctet { .. })
        ));
        assert!(decimal_mac_to_hex("1.2.256.4.5.6").is_err());
        assert!(decimal_mac_to_hex("").is_err());
    }

    #[test]
    fn test_extract_vlan_generic_is_zero() {
        for oid in [
            "1.3.6.1.2.1.17.4.3.1.2.0.1.2.3.4.5",
            "1.3.6.1.2.1.17.7.1.2.2.1.2.10.0.1.2.3.4.5",
            "",
            "garbage",
        ] {
            assert_eq!(extract_vlan(oid, System::Generic), 0);
        }
    }

    #[test]
    fn test_extract_vlan_unifi() {
        assert_eq!(
            extract_vlan("1.3.6.1.2.1.17.7.1.2.2.1.2.10.0.1.2.3.4.5", System::Unifi),
            10
        );
        assert_eq!(
            extract_vlan(".1.3.6.1.2.1.17.7.1.2.2.1.2.4094.0.1.2.3.4.5", System::Unifi),
            4094
        );
        // Якоря нет
        assert_eq!(extract_vlan("1.3.6.1.2.1.17.4.3.1.2.0.1.2.3.4.5", System::Unifi), 0);
        // Якорь в самом конце, VLAN отсутствует
        assert_eq!(extract_vlan("9.2.2.1.2", System::Unifi), 0);
    }

    #[test]
    fn test_mac_suffix() {
        assert_eq!(
            mac_suffix("1.3.6.1.2.1.17.4.3.1.2.0.1.2.3.4.5", System::Generic).unwrap(),
            "0.1.2.3.4.5"
        );
        assert_eq!(
            mac_suffix("1.3.6.1.2.1.17.7.1.2.2.1.2.10.0.1.2.3.4.5", System::Unifi).unwrap(),
            "0.1.2.3.4.5"
        );
    }

    #[test]
    fn test_decode_generic_mac_row() {
        let row = Varbind::new(
            "1.3.6.1.2.1.17.4.3.1.2.0.1.2.3.4.5",
            SnmpValue::Integer(7),
        );
        let obs = decode_mac_row(&row, System::Generic).unwrap();
        assert_eq!(
            obs,
            MacObservation {
                port_index: 7,
                vlan: 0,
                mac: "00:01:02:03:04:05".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_generic_mac_row_ignores_trailing_components() {
        let row = Varbind::new(
            "1.3.6.1.2.1.17.4.3.1.2.0.1.2.3.4.5.6",
            SnmpValue::Integer(7),
        );
        let obs = decode_mac_row(&row, System::Generic).unwrap();
        assert_eq!(obs.port_index, 7);
        assert_eq!(obs.vlan, 0);
        assert_eq!(obs.mac, "00:01:02:03:04:05");
    }

    #[test]
    fn test_decode_unifi_mac_row() {
        let row = Varbind::new(
            ".1.3.6.1.2.1.17.7.1.2.2.1.2.20.228.56.131.10.11.12",
            SnmpValue::Integer(5),
        );
        let obs = decode_mac_row(&row, System::Unifi).unwrap();
        assert_eq!(obs.port_index, 5);
        assert_eq!(obs.vlan, 20);
        assert_eq!(obs.mac, "e4:38:83:0a:0b:0c");
    }

    #[test]
    fn test_decode_mac_row_rejects_non_integer_value() {
        let row = Varbind::new(
            "1.3.6.1.2.1.17.4.3.1.2.0.1.2.3.4.5",
            SnmpValue::Text("7".to_string()),
        );
        assert!(matches!(
            decode_mac_row(&row, System::Generic),
            Err(DecodeError::NotInteger { .. })
        ));
    }
}
