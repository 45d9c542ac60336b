use super::{normalize_champion, Category, ChampionMeta, RefEntry, ReferenceLookup};
use crate::api::transport::Transport;
use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

pub const CDN: &str = "https://ddragon.leagueoflegends.com";

#[derive(Debug, Deserialize)]
struct DataFile<T> {
    data: HashMap<String, T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Image {
    full: String,
}

#[derive(Debug, Deserialize)]
struct ItemData {
    name: String,
    #[serde(default)]
    image: Image,
}

#[derive(Debug, Deserialize)]
struct SpellData {
    key: String,
    name: String,
    #[serde(default)]
    image: Image,
}

#[derive(Debug, Deserialize)]
struct ChampionData {
    id: String,
    key: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RuneStyleData {
    id: i64,
    name: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    slots: Vec<RuneSlotData>,
}

#[derive(Debug, Deserialize)]
struct RuneSlotData {
    #[serde(default)]
    runes: Vec<RuneData>,
}

#[derive(Debug, Deserialize)]
struct RuneData {
    id: i64,
    name: String,
    #[serde(default)]
    icon: String,
}

/// One Data Dragon version, indexed for lookups.
#[derive(Debug, Default)]
pub struct Catalog {
    version: String,
    items: HashMap<i64, RefEntry>,
    spells: HashMap<i64, RefEntry>,
    rune_styles: HashMap<i64, RefEntry>,
    // every rune of every slot, keystones included
    runes: HashMap<i64, RefEntry>,
    champions_by_key: HashMap<i64, ChampionMeta>,
    champions_by_norm: HashMap<String, ChampionMeta>,
}

impl Catalog {
    fn build(
        version: String,
        items: DataFile<ItemData>,
        spells: DataFile<SpellData>,
        runes: Vec<RuneStyleData>,
        champions: DataFile<ChampionData>,
    ) -> Self {
        let img = |kind: &str, full: &str| {
            (!full.is_empty()).then(|| format!("{}/cdn/{}/img/{}/{}", CDN, version, kind, full))
        };
        let rune_icon = |icon: &str| (!icon.is_empty()).then(|| format!("{}/cdn/img/{}", CDN, icon));

        let items = items
            .data
            .into_iter()
            .filter_map(|(id, item)| {
                let id: i64 = id.parse().ok()?;
                let icon = img("item", &item.image.full);
                Some((id, RefEntry { name: item.name, icon }))
            })
            .collect();

        let spells = spells
            .data
            .into_values()
            .filter_map(|spell| {
                let key: i64 = spell.key.parse().ok()?;
                let icon = img("spell", &spell.image.full);
                Some((key, RefEntry { name: spell.name, icon }))
            })
            .collect();

        let mut rune_styles = HashMap::new();
        let mut rune_entries = HashMap::new();
        for style in runes {
            for rune in style.slots.into_iter().flat_map(|slot| slot.runes) {
                let icon = rune_icon(&rune.icon);
                rune_entries.insert(rune.id, RefEntry { name: rune.name, icon });
            }
            let icon = rune_icon(&style.icon);
            rune_styles.insert(style.id, RefEntry { name: style.name, icon });
        }

        let mut champions_by_key = HashMap::new();
        let mut champions_by_norm = HashMap::new();
        for champion in champions.data.into_values() {
            let meta = ChampionMeta {
                icon: img("champion", &format!("{}.png", champion.id)),
                id: champion.id,
                name: champion.name,
            };
            champions_by_norm.insert(normalize_champion(&meta.id), meta.clone());
            champions_by_norm.insert(normalize_champion(&meta.name), meta.clone());
            if let Ok(key) = champion.key.parse::<i64>() {
                champions_by_key.insert(key, meta);
            }
        }

        Catalog {
            version,
            items,
            spells,
            rune_styles,
            runes: rune_entries,
            champions_by_key,
            champions_by_norm,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn profile_icon_url(&self, profile_icon_id: i64) -> String {
        format!("{}/cdn/{}/img/profileicon/{}.png", CDN, self.version, profile_icon_id)
    }
}

impl ReferenceLookup for Catalog {
    fn entry(&self, category: Category, id: i64) -> Option<RefEntry> {
        match category {
            Category::Item => self.items.get(&id).cloned(),
            Category::Spell => self.spells.get(&id).cloned(),
            Category::RuneStyle => self.rune_styles.get(&id).cloned(),
            Category::Keystone => self.runes.get(&id).cloned(),
            Category::Champion => self.champions_by_key.get(&id).map(|c| RefEntry {
                name: c.name.clone(),
                icon: c.icon.clone(),
            }),
        }
    }

    fn champion(&self, name: &str, key: i64) -> Option<ChampionMeta> {
        if key != 0 {
            if let Some(meta) = self.champions_by_key.get(&key) {
                return Some(meta.clone());
            }
        }
        self.champions_by_norm.get(&normalize_champion(name)).cloned()
    }
}

/// Process-wide Data Dragon cache.
///
/// `initialize()` loads at most once: concurrent callers queue on the same
/// lock and receive the catalog loaded by whoever got there first. A failed
/// load leaves the cache empty so a later call can retry.
pub struct ReferenceData {
    transport: Arc<dyn Transport>,
    base_url: String,
    locale: String,
    catalog: Mutex<Option<Arc<Catalog>>>,
    ready: AtomicBool,
}

impl ReferenceData {
    pub fn new(transport: Arc<dyn Transport>, locale: &str) -> Self {
        Self::with_base_url(transport, CDN, locale)
    }

    pub fn with_base_url(transport: Arc<dyn Transport>, base_url: &str, locale: &str) -> Self {
        ReferenceData {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            locale: locale.to_string(),
            catalog: Mutex::new(None),
            ready: AtomicBool::new(false),
        }
    }

    pub fn initialize(&self) -> Result<Arc<Catalog>, AppError> {
        let mut slot = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(catalog) = slot.as_ref() {
            return Ok(Arc::clone(catalog));
        }

        let catalog = Arc::new(self.load()?);
        info!(version = catalog.version(), locale = %self.locale, "reference data loaded");
        *slot = Some(Arc::clone(&catalog));
        self.ready.store(true, Ordering::Release);
        Ok(catalog)
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// The loaded catalog, without triggering a load.
    pub fn catalog(&self) -> Option<Arc<Catalog>> {
        if !self.is_ready() {
            return None;
        }
        self.catalog
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn load(&self) -> Result<Catalog, AppError> {
        let versions: Vec<String> = self.get_json(&format!("{}/api/versions.json", self.base_url))?;
        let version = versions
            .into_iter()
            .next()
            .ok_or_else(|| AppError::JsonError("Data Dragon returned no versions".to_string()))?;

        let data_url = |file: &str| format!("{}/cdn/{}/data/{}/{}", self.base_url, version, self.locale, file);
        let items = self.get_json(&data_url("item.json"))?;
        let spells = self.get_json(&data_url("summoner.json"))?;
        let runes = self.get_json(&data_url("runesReforged.json"))?;
        let champions = self.get_json(&data_url("champion.json"))?;

        Ok(Catalog::build(version, items, spells, runes, champions))
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        debug!("GET {}", url);
        let response = self.transport.get(url, &[])?;
        if !response.is_success() {
            return Err(AppError::Upstream {
                status: response.status,
                status_text: response.status_text,
                body: response.body,
            });
        }
        Ok(serde_json::from_str(&response.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::testing::{json, text, FakeTransport};
    use crate::api::transport::HttpResponse;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use std::thread;
    use std::time::Duration;

    fn ddragon(url: &str) -> HttpResponse {
        if url.ends_with("versions.json") {
            json(200, json!(["15.1.1", "14.24.1"]))
        } else if url.ends_with("item.json") {
            json(200, json!({ "data": { "3031": { "name": "Infinity Edge", "image": { "full": "3031.png" } } } }))
        } else if url.ends_with("summoner.json") {
            json(200, json!({ "data": { "SummonerFlash": { "key": "4", "name": "Flash", "image": { "full": "SummonerFlash.png" } } } }))
        } else if url.ends_with("runesReforged.json") {
            json(200, json!([{
                "id": 8100, "name": "Domination", "icon": "perk-images/Styles/7200_Domination.png",
                "slots": [{ "runes": [{ "id": 8112, "name": "Electrocute", "icon": "e.png" }] }]
            }]))
        } else {
            json(200, json!({ "data": {
                "MonkeyKing": { "id": "MonkeyKing", "key": "62", "name": "Wukong" },
                "Kaisa": { "id": "Kaisa", "key": "145", "name": "Kai'Sa" }
            }}))
        }
    }

    fn loaded() -> Arc<Catalog> {
        let transport = Arc::new(FakeTransport::new(ddragon));
        ReferenceData::new(transport, "en_US").initialize().unwrap()
    }

    #[test]
    fn catalog_lookups() {
        let catalog = loaded();
        assert_eq!(catalog.version(), "15.1.1");
        assert_eq!(catalog.label(Category::Item, 3031), "Infinity Edge");
        assert_eq!(catalog.label(Category::Spell, 4), "Flash");
        assert_eq!(catalog.label(Category::RuneStyle, 8100), "Domination");
        assert_eq!(catalog.label(Category::Keystone, 8112), "Electrocute");
        assert_eq!(catalog.label(Category::Item, 1), "Item 1");
        assert_eq!(
            catalog.entry(Category::Spell, 4).and_then(|e| e.icon).as_deref(),
            Some("https://ddragon.leagueoflegends.com/cdn/15.1.1/img/spell/SummonerFlash.png")
        );
        assert_eq!(
            catalog.profile_icon_url(29),
            "https://ddragon.leagueoflegends.com/cdn/15.1.1/img/profileicon/29.png"
        );
    }

    #[test]
    fn champion_by_key_then_by_name() {
        let catalog = loaded();
        assert_eq!(catalog.champion("whatever", 62).map(|c| c.id).as_deref(), Some("MonkeyKing"));
        assert_eq!(catalog.champion("Wukong", 0).map(|c| c.id).as_deref(), Some("MonkeyKing"));
        assert_eq!(catalog.champion("KaiSa", 9999).map(|c| c.name).as_deref(), Some("Kai'Sa"));
        assert!(catalog.champion("Nobody", 0).is_none());
    }

    #[test]
    fn concurrent_initialize_loads_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let transport = Arc::new(FakeTransport::new(move |url| {
            if url.ends_with("versions.json") {
                counter.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(50));
            }
            ddragon(url)
        }));
        let reference = ReferenceData::new(transport, "en_US");
        assert!(!reference.is_ready());
        assert!(reference.catalog().is_none());

        let shared = &reference;
        thread::scope(|scope| {
            let handles: Vec<_> = (0..6)
                .map(|_| scope.spawn(move || shared.initialize()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap().unwrap().version(), "15.1.1");
            }
        });

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(reference.is_ready());
        assert!(reference.catalog().is_some());
    }

    #[test]
    fn failed_load_can_be_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let transport = Arc::new(FakeTransport::new(move |url| {
            if url.ends_with("versions.json") && counter.fetch_add(1, Ordering::SeqCst) == 0 {
                return text(503, "down");
            }
            ddragon(url)
        }));
        let reference = ReferenceData::new(transport, "fr_FR");

        assert!(matches!(reference.initialize(), Err(AppError::Upstream { status: 503, .. })));
        assert!(!reference.is_ready());
        assert!(reference.initialize().is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn data_files_use_configured_locale() {
        let transport = Arc::new(FakeTransport::new(ddragon));
        let reference = ReferenceData::new(transport.clone(), "fr_FR");
        reference.initialize().unwrap();
        assert!(transport
            .urls()
            .iter()
            .any(|u| u == "https://ddragon.leagueoflegends.com/cdn/15.1.1/data/fr_FR/item.json"));
    }
}
