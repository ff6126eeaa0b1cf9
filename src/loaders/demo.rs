use crate::results::LinkRecord;

const SOURCES: [&str; 3] = [
    "https://ejemplo.com/pagina1",
    "https://ejemplo.com/pagina2",
    "https://ejemplo.com/pagina3",
];

const DESTINATIONS: [&str; 3] = [
    "https://ejemplo.com/roto1",
    "https://ejemplo.com/roto2",
    "https://ejemplo.com/redirect1",
];

const ANCHORS: [&str; 3] = ["Click aquí", "Ver más", "Conoce más"];

const STATUSES: [u16; 3] = [404, 404, 301];

const REPEAT: usize = 10;

/// Fixed demonstration table: three links repeated ten times
pub fn records() -> Vec<LinkRecord> {
    (0..REPEAT)
        .flat_map(|_| 0..SOURCES.len())
        .map(|i| LinkRecord::new(SOURCES[i], DESTINATIONS[i], Some(ANCHORS[i]), STATUSES[i]))
        .collect()
}
