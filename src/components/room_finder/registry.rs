use super::models::{Room, SectionSlot, TimeOfDay, WeekdayTag};
use crate::error::BotResult;
use std::collections::HashMap;

/// Every known room, keyed by its scraped location label.
///
/// Rooms keep the order in which their location was first seen. A registry
/// is built in one pass and then only read; refreshing builds a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    rooms: Vec<Room>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from extracted slots
    pub fn from_slots(slots: impl IntoIterator<Item = SectionSlot>) -> Self {
        let mut registry = Self::new();
        registry.ingest(slots);
        registry
    }

    /// Build a registry from already grouped rooms. Repeated locations are merged.
    pub fn from_rooms(rooms: impl IntoIterator<Item = Room>) -> Self {
        let mut registry = Self::new();
        for room in rooms {
            let slot = registry.room_slot(&room.location);
            registry.rooms[slot].bookings.extend(room.bookings);
        }
        registry
    }

    /// Append each slot as a booking of its room, creating rooms as needed
    pub fn ingest(&mut self, slots: impl IntoIterator<Item = SectionSlot>) {
        for slot in slots {
            let index = self.room_slot(&slot.location);
            self.rooms[index].add_booking(slot.day, slot.interval);
        }
    }

    fn room_slot(&mut self, location: &str) -> usize {
        if let Some(&index) = self.index.get(location) {
            return index;
        }
        self.rooms.push(Room::new(location));
        let index = self.rooms.len() - 1;
        self.index.insert(location.to_string(), index);
        index
    }

    pub fn get(&self, location: &str) -> Option<&Room> {
        self.index.get(location).map(|&index| &self.rooms[index])
    }

    /// Whether a known room is free; `None` for unknown locations
    pub fn is_open(&self, location: &str, day: WeekdayTag, instant: TimeOfDay) -> Option<bool> {
        self.get(location).map(|room| room.is_open(day, instant))
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Serialize as the cache file's JSON array
    pub fn to_json(&self) -> BotResult<String> {
        Ok(serde_json::to_string(&self.rooms)?)
    }

    /// Parse the cache file's JSON array into a fresh registry
    pub fn from_json(json: &str) -> BotResult<Self> {
        let rooms: Vec<Room> = serde_json::from_str(json)?;
        Ok(Self::from_rooms(rooms))
    }
}
