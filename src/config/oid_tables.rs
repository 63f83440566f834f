use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

const OPER_STATE: &[(i64, &str)] = &[
    (1, "UP"),
    (2, "DOWN"),
    (3, "TESTING"),
    (4, "UNKNOWN"),
    (5, "DORMANT"),
    (6, "NOT_PRESENT"),
    (7, "LOWER_LAYER_DOWN"),
];

// IANAifType-MIB, только то, что реально встречается на коммутаторах
const INTERFACE_TYPE: &[(i64, &str)] = &[
    (1, "other"),
    (6, "ethernetCsmacd"),
    (7, "iso88023Csmacd"),
    (9, "iso88025TokenRing"),
    (15, "fddi"),
    (18, "ds1"),
    (23, "ppp"),
    (24, "softwareLoopback"),
    (30, "ds3"),
    (32, "frameRelay"),
    (37, "atm"),
    (49, "aal5"),
    (53, "propVirtual"),
    (54, "propMultiplexor"),
    (56, "fibreChannel"),
    (62, "fastEther"),
    (63, "isdn"),
    (69, "fastEtherFX"),
    (71, "ieee80211"),
    (94, "adsl"),
    (108, "pppMultilinkBundle"),
    (117, "gigabitEthernet"),
    (131, "tunnel"),
    (135, "l2vlan"),
    (136, "l3ipvlan"),
    (142, "ipForward"),
    (150, "mplsTunnel"),
    (161, "ieee8023adLag"),
    (166, "mpls"),
    (188, "radioMAC"),
    (209, "bridge"),
    (244, "wwanPP2"),
];

/// Справочники кодов ifOperStatus и ifType.
///
/// Загружаются один раз при старте и дальше только читаются.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OidTables {
    oper_state: BTreeMap<i64, String>,
    interface_type: BTreeMap<i64, String>,
}

/// Формат файла: ключи - строки с кодом, как в JSON
#[derive(Debug, Deserialize)]
struct OidTablesFile {
    #[serde(default)]
    oper_state: HashMap<String, String>,
    #[serde(default)]
    int_type_num: HashMap<String, String>,
}

impl Default for OidTables {
    fn default() -> Self {
        Self {
            oper_state: to_map(OPER_STATE),
            interface_type: to_map(INTERFACE_TYPE),
        }
    }
}

fn to_map(pairs: &[(i64, &str)]) -> BTreeMap<i64, String> {
    pairs
        .iter()
        .map(|(code, name)| (*code, name.to_string()))
        .collect()
}

fn merge_codes(
    target: &mut BTreeMap<i64, String>,
    entries: HashMap<String, String>,
    table: &str,
) -> Result<()> {
    for (code, name) in entries {
        let code: i64 = code
            .trim()
            .parse()
            .with_context(|| format!("Невалидный код '{}' в таблице {}", code, table))?;
        target.insert(code, name);
    }
    Ok(())
}

impl OidTables {
    /// Встроенные таблицы, поверх которых накладываются записи из файла
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Не удалось прочитать файл: {}", path.display()))?;
        Self::from_str_with_defaults(&content)
    }

    /// YAML или JSON (JSON - подмножество YAML)
    pub fn from_str_with_defaults(content: &str) -> Result<Self> {
        let file: OidTablesFile =
            serde_yml::from_str(content).context("Не удалось распарсить таблицы OID")?;

        let mut tables = Self::default();
        merge_codes(&mut tables.oper_state, file.oper_state, "oper_state")?;
        merge_codes(&mut tables.interface_type, file.int_type_num, "int_type_num")?;
        Ok(tables)
    }

    /// Код ifOperStatus в метку; неизвестный код даёт UNKNOWN(<код>)
    pub fn oper_state(&self, code: i64) -> String {
        lookup(&self.oper_state, code)
    }

    /// Код ifType в метку; неизвестный код даёт UNKNOWN(<код>)
    pub fn interface_type(&self, code: i64) -> String {
        lookup(&self.interface_type, code)
    }
}

fn lookup(table: &BTreeMap<i64, String>, code: i64) -> String {
    table
        .get(&code)
        .cloned()
        .unwrap_or_else(|| format!("UNKNOWN({})", code))
}
