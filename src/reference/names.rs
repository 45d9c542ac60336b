use super::{Category, ChampionMeta, RefEntry, ReferenceLookup};

const SPELLS: &[(i64, &str)] = &[
    (1, "Cleanse"),
    (3, "Exhaust"),
    (4, "Flash"),
    (6, "Ghost"),
    (7, "Heal"),
    (11, "Smite"),
    (12, "Teleport"),
    (13, "Clarity"),
    (14, "Ignite"),
    (21, "Barrier"),
    (32, "Mark"),
    (39, "Dash"),
];

const RUNE_STYLES: &[(i64, &str)] = &[
    (8000, "Precision"),
    (8100, "Domination"),
    (8200, "Sorcery"),
    (8300, "Inspiration"),
    (8400, "Resolve"),
];

const KEYSTONES: &[(i64, &str)] = &[
    (8005, "Press the Attack"),
    (8008, "Lethal Tempo"),
    (8010, "Conqueror"),
    (8021, "Fleet Footwork"),
    (8112, "Electrocute"),
    (8124, "Predator"),
    (8128, "Dark Harvest"),
    (9923, "Hail of Blades"),
    (8214, "Summon Aery"),
    (8229, "Arcane Comet"),
    (8230, "Phase Rush"),
    (8437, "Grasp of the Undying"),
    (8439, "Aftershock"),
    (8465, "Guardian"),
    (8351, "Glacial Augment"),
    (8360, "Unsealed Spellbook"),
    (8369, "First Strike"),
];

/// Built-in names for the common spells and runes, used when Data Dragon
/// is unreachable. Items and champions are not covered.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticNames;

impl ReferenceLookup for StaticNames {
    fn entry(&self, category: Category, id: i64) -> Option<RefEntry> {
        let table = match category {
            Category::Spell => SPELLS,
            Category::RuneStyle => RUNE_STYLES,
            Category::Keystone => KEYSTONES,
            Category::Item | Category::Champion => return None,
        };
        table
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, name)| RefEntry {
                name: name.to_string(),
                icon: None,
            })
    }

    fn champion(&self, _name: &str, _key: i64) -> Option<ChampionMeta> {
        None
    }
}
