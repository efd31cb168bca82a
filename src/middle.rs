// The middle layer: the only thing that mutates the board.
// Every intent goes through `handle_intent`, which applies it and, when the change
// is something the record holds, saves right away. No dirty flags, no debounce.

use crate::audio_api::AudioBackend;
use crate::pipeline::board::Board;
use crate::pipeline::layout::{Theme, Zone};
use crate::pipeline::persistence::{self, LoadOutcome};
use crate::pipeline::storage::Storage;
use crate::shared::{Change, DisplayState, Intent, ZoneView};

pub struct Middle {
    pub board: Board,
    storage: Box<dyn Storage>,
    backend: Box<dyn AudioBackend>,
    theme: Theme,
    status: String,
}

impl Middle {
    pub fn new(storage: Box<dyn Storage>, backend: Box<dyn AudioBackend>) -> Self {
        Self {
            board: Board::new(),
            storage,
            backend,
            theme: Theme::default(),
            status: String::new(),
        }
    }

    // startup: theme first, then the board (or the default pads)
    pub fn load(&mut self) -> LoadOutcome {
        self.theme = persistence::load_theme(self.storage.as_ref());
        let outcome = persistence::load_board(self.storage.as_ref(), &mut self.board, self.backend.as_mut());
        self.status = match &outcome {
            LoadOutcome::FirstRun => "New board".to_string(),
            LoadOutcome::Restored { pads, tracks } => format!("Loaded {pads} pads, {tracks} tracks"),
            LoadOutcome::Recovered(_) => "Saved board was damaged, started fresh".to_string(),
        };
        outcome
    }

    pub fn handle_intent(&mut self, intent: Intent) -> Change {
        let backend = self.backend.as_mut();
        let board = &mut self.board;
        let change = match intent {
            Intent::AddPad => board.add_pad().1,
            Intent::ClickPad(id) => board.click_pad(&id),
            Intent::DropOnPad(id, payload) => board.drop_on_pad(&id, payload, backend),
            Intent::RemovePad(id) => board.remove_pad(&id),
            Intent::SetPadColor(id, color) => board.set_pad_color(&id, &color),
            Intent::SetPadVolume(id, volume) => board.set_pad_volume(&id, volume),
            Intent::ToggleRemoveMode => board.toggle_remove_mode(),
            Intent::ToggleColorMode => board.toggle_color_mode(),

            Intent::AddTrack(file) => {
                let name = file.file_name();
                let change = board.add_track(file, backend);
                if change == Change::None {
                    self.status = format!("{name} is not an audio file");
                }
                change
            }
            Intent::ToggleTrackPlay(i) => board.toggle_track_play(i),
            Intent::RestartTrack(i) => board.restart_track(i),
            Intent::ToggleTrackLoop(i) => board.toggle_track_loop(i),
            Intent::SetTrackVolume(i, volume) => board.set_track_volume(i, volume),
            Intent::RemoveTrack(i) => board.remove_track(i),

            Intent::MoveBlock(block, zone) => board.move_block(block, zone),
            Intent::BeginResize => board.begin_resize(),
            Intent::ResizeTo(px) => board.resize_to(px),
            Intent::EndResize => board.end_resize(),
            Intent::CycleTheme => return self.cycle_theme(),

            Intent::Quit => Change::None,
        };

        if change == Change::Persistent {
            self.save();
        }
        change
    }

    // the theme has its own key and never touches the board record
    fn cycle_theme(&mut self) -> Change {
        self.theme = self.theme.next();
        if let Err(e) = persistence::save_theme(self.storage.as_mut(), self.theme) {
            log::error!("failed to save theme: {e:#}");
        }
        self.status = format!("Theme: {}", self.theme.name());
        Change::Transient
    }

    // A failed save is logged, never fatal: the board on screen is still right.
    pub fn save(&mut self) {
        match persistence::save_board(self.storage.as_mut(), &self.board) {
            Ok(()) => self.status = "Saved".to_string(),
            Err(e) => {
                log::error!("failed to save board: {e:#}");
                self.status = format!("Save failed: {e}");
            }
        }
    }

    pub fn tick(&mut self, elapsed: f64) {
        self.backend.maintain();
        self.board.tick(elapsed);
    }

    pub fn display_state(&self) -> DisplayState {
        let layout = &self.board.layout;
        DisplayState {
            pads: self.board.pads.iter().map(|p| p.view()).collect(),
            tracks: self.board.tracks.iter().map(|t| t.view()).collect(),
            left: ZoneView {
                block: layout.content(Zone::Left),
                weight: layout.left.0.clone(),
            },
            right: ZoneView {
                block: layout.content(Zone::Right),
                weight: layout.right.0.clone(),
            },
            edit_mode: self.board.edit_mode,
            theme: self.theme,
            resizing: layout.is_resizing(),
            divider_px: layout.divider_px(),
            status: self.status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::library::{sound_library, DropPayload, FileDrop};
    use crate::pipeline::layout::ContentBlock;
    use crate::pipeline::persistence::{RECORD_KEY, THEME_KEY};
    use crate::pipeline::project::PersistedRecord;
    use crate::pipeline::test_fixture::{FakeBackend, MemoryStorage, ReadOnlyStorage};
    use crate::shared::EditMode;

    fn middle() -> (Middle, MemoryStorage, FakeBackend) {
        let storage = MemoryStorage::default();
        let backend = FakeBackend::default();
        let mut middle = Middle::new(Box::new(storage.clone()), Box::new(backend.clone()));
        middle.load();
        (middle, storage, backend)
    }

    fn saved(storage: &MemoryStorage) -> PersistedRecord {
        PersistedRecord::parse(&storage.raw(RECORD_KEY).unwrap()).unwrap()
    }

    #[test]
    fn first_load_does_not_write() {
        let (m, storage, _) = middle();
        assert_eq!(storage.writes(), 0);
        assert_eq!(m.display_state().pads.len(), 4);
    }

    #[test]
    fn persistent_changes_save_transient_ones_dont() {
        let (mut m, storage, backend) = middle();
        let pad = m.board.pads[0].id.clone();

        m.handle_intent(Intent::ToggleColorMode);
        m.handle_intent(Intent::ToggleColorMode);
        m.handle_intent(Intent::ClickPad(pad.clone()));
        assert_eq!(storage.writes(), 0);

        let bumbo = DropPayload::Library(sound_library()[0].clone());
        assert_eq!(m.handle_intent(Intent::DropOnPad(pad.clone(), bumbo)), Change::Persistent);
        assert_eq!(storage.writes(), 1);
        assert_eq!(saved(&storage).pads[0].file_name.as_deref(), Some("Bumbo"));

        assert_eq!(m.handle_intent(Intent::ClickPad(pad.clone())), Change::Transient);
        assert_eq!(backend.spy(0).borrow().plays, 1);
        assert_eq!(storage.writes(), 1);

        m.handle_intent(Intent::SetPadColor(pad.clone(), "#3355ff".into()));
        m.handle_intent(Intent::SetPadVolume(pad, 0.4));
        assert_eq!(storage.writes(), 3);
        let rec = saved(&storage);
        assert_eq!(rec.pads[0].color, "#3355ff");
        assert_eq!(rec.pads[0].volume, 0.4);
    }

    #[test]
    fn ignored_drops_do_not_save() {
        let (mut m, storage, _) = middle();
        let pad = m.board.pads[1].id.clone();
        let text = DropPayload::File(FileDrop::from_path("/tmp/lyrics.txt"));
        assert_eq!(m.handle_intent(Intent::DropOnPad(pad, text)), Change::None);
        assert_eq!(m.handle_intent(Intent::AddTrack(FileDrop::from_path("/tmp/lyrics.txt"))), Change::None);
        assert_eq!(storage.writes(), 0);
        assert!(m.display_state().status.contains("not an audio file"));
    }

    #[test]
    fn resize_saves_once_per_gesture() {
        let (mut m, storage, _) = middle();
        m.handle_intent(Intent::BeginResize);
        for px in [310, 330, 350, 370] {
            m.handle_intent(Intent::ResizeTo(px));
        }
        assert_eq!(storage.writes(), 0);
        assert!(m.display_state().resizing);
        m.handle_intent(Intent::EndResize);
        assert_eq!(storage.writes(), 1);
        assert_eq!(saved(&storage).layout.left, "0 0 370px");
    }

    #[test]
    fn swapping_zones_is_saved() {
        let (mut m, storage, _) = middle();
        m.handle_intent(Intent::MoveBlock(ContentBlock::PadBank, Zone::Right));
        let ds = m.display_state();
        assert_eq!(ds.left.block, ContentBlock::TrackList);
        assert_eq!(ds.right.block, ContentBlock::PadBank);
        let rec = saved(&storage);
        assert_eq!(rec.layout.left_content, "track-list");
        assert_eq!(rec.layout.right_content, "pad-container");
    }

    #[test]
    fn tracks_are_saved_but_transport_is_not() {
        let (mut m, storage, _) = middle();
        m.handle_intent(Intent::AddTrack(FileDrop::from_path("/music/loop.wav")));
        assert_eq!(storage.writes(), 1);
        m.handle_intent(Intent::ToggleTrackPlay(0));
        m.handle_intent(Intent::ToggleTrackLoop(0));
        m.handle_intent(Intent::SetTrackVolume(0, 0.5));
        m.handle_intent(Intent::RestartTrack(0));
        assert_eq!(storage.writes(), 1);

        let ds = m.display_state();
        assert!(ds.tracks[0].playing && ds.tracks[0].looping);
        m.handle_intent(Intent::RemoveTrack(0));
        assert_eq!(storage.writes(), 2);
        assert!(saved(&storage).tracks.is_empty());
    }

    #[test]
    fn theme_cycles_under_its_own_key() {
        let (mut m, storage, _) = middle();
        m.handle_intent(Intent::CycleTheme);
        assert_eq!(m.display_state().theme, Theme::Alt1);
        assert_eq!(storage.raw(THEME_KEY).as_deref(), Some("layout-alt1"));
        assert_eq!(storage.raw(RECORD_KEY), None);

        // and comes back on the next start
        let mut again = Middle::new(Box::new(storage.clone()), Box::new(FakeBackend::default()));
        again.load();
        assert_eq!(again.display_state().theme, Theme::Alt1);
    }

    #[test]
    fn reload_restores_what_was_saved() {
        let (mut m, storage, _) = middle();
        let pad = m.board.pads[2].id.clone();
        m.handle_intent(Intent::DropOnPad(pad.clone(), DropPayload::File(FileDrop::from_path("/s/clap.wav"))));
        m.handle_intent(Intent::RemovePad(m.board.pads[0].id.clone()));
        m.handle_intent(Intent::AddPad);

        let backend = FakeBackend::default();
        let mut again = Middle::new(Box::new(storage.clone()), Box::new(backend.clone()));
        again.load();
        assert_eq!(again.board.snapshot(), m.board.snapshot());
        assert_eq!(again.board.pads.len(), 4);
        assert!(again.board.pad(&pad).unwrap().is_bound());
        assert_eq!(backend.opened(), 1);
    }

    #[test]
    fn edit_mode_shows_up_in_the_display() {
        let (mut m, _, _) = middle();
        m.handle_intent(Intent::ToggleRemoveMode);
        assert_eq!(m.display_state().edit_mode, EditMode::Remove);
    }

    #[test]
    fn failed_saves_keep_the_board() {
        let mut m = Middle::new(
            Box::new(ReadOnlyStorage(MemoryStorage::default())),
            Box::new(FakeBackend::default()),
        );
        m.load();
        assert_eq!(m.handle_intent(Intent::AddPad), Change::Persistent);
        assert_eq!(m.board.pads.len(), 5);
        assert!(m.display_state().status.starts_with("Save failed"));
    }

    #[test]
    fn ticks_let_the_backend_tidy_up() {
        let (mut m, storage, backend) = middle();
        assert_eq!(backend.maintained(), 0);
        m.tick(0.016);
        m.tick(0.016);
        assert_eq!(backend.maintained(), 2);
        assert_eq!(storage.writes(), 0);
    }
}
