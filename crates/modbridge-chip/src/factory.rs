//! Player registry and format detection.

use std::fmt;

use modbridge_vfs::MemoryProvider;

use crate::chip::SynthChip;
use crate::player::TickPlayer;

/// Constructor for a fresh, unloaded player.
pub type PlayerConstructor = fn() -> Box<dyn TickPlayer>;

/// Static description of a player implementation.
#[derive(Clone, Copy)]
pub struct PlayerDescriptor {
    name: &'static str,
    extensions: &'static [&'static str],
    create: PlayerConstructor,
}

impl PlayerDescriptor {
    /// Describe a player. Extensions include the leading dot (`".d00"`).
    pub const fn new(
        name: &'static str,
        extensions: &'static [&'static str],
        create: PlayerConstructor,
    ) -> Self {
        Self {
            name,
            extensions,
            create,
        }
    }

    /// Player name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// File extensions handled by this player.
    pub fn extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    /// Whether `filename` ends with one of the extensions (ASCII
    /// case-insensitive).
    pub fn matches_extension(&self, filename: &str) -> bool {
        let name = filename.as_bytes();
        self.extensions.iter().any(|ext| {
            let ext = ext.as_bytes();
            name.len() >= ext.len() && name[name.len() - ext.len()..].eq_ignore_ascii_case(ext)
        })
    }

    /// Build a fresh player.
    pub fn create(&self) -> Box<dyn TickPlayer> {
        (self.create)()
    }
}

impl fmt::Debug for PlayerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerDescriptor")
            .field("name", &self.name)
            .field("extensions", &self.extensions)
            .finish()
    }
}

/// A player that accepted a file.
pub struct LoadedPlayer {
    /// The loaded player.
    pub player: Box<dyn TickPlayer>,
    /// Descriptor it was created from.
    pub descriptor: PlayerDescriptor,
}

impl fmt::Debug for LoadedPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedPlayer")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Ordered set of players tried by [`PlayerRegistry::factory`].
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: Vec<PlayerDescriptor>,
}

impl PlayerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, descriptor: PlayerDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Append a player. Earlier players win ties.
    pub fn register(&mut self, descriptor: PlayerDescriptor) {
        self.players.push(descriptor);
    }

    /// Registered players in probe order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerDescriptor> {
        self.players.iter()
    }

    /// Number of registered players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether no player is registered.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Find a player for `filename`.
    ///
    /// Players whose extension matches are tried first, then every player in
    /// registration order. A player that already failed in the first pass is
    /// tried again in the second.
    pub fn factory(
        &self,
        filename: &str,
        chip: &mut dyn SynthChip,
        provider: &MemoryProvider,
    ) -> Option<LoadedPlayer> {
        let by_extension = self
            .players
            .iter()
            .filter(|descriptor| descriptor.matches_extension(filename));

        for descriptor in by_extension.chain(self.players.iter()) {
            let mut player = descriptor.create();
            if player.load(filename, provider, chip) {
                log::debug!("chip: '{filename}' loaded by {}", descriptor.name());
                return Some(LoadedPlayer {
                    player,
                    descriptor: *descriptor,
                });
            }
        }
        None
    }
}

impl FromIterator<PlayerDescriptor> for PlayerRegistry {
    fn from_iter<I: IntoIterator<Item = PlayerDescriptor>>(iter: I) -> Self {
        Self {
            players: iter.into_iter().collect(),
        }
    }
}
