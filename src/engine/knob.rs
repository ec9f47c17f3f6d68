/// A value with a stored "home" setting and a "live" setting that automation
/// may move away from it.
///
/// Explicit setters change both. Automation replay changes only `live`.
/// [`Knob::restore`] snaps live back home, [`Knob::commit`] keeps the live
/// value as the new home.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knob<T> {
    home: T,
    live: T,
}

impl<T: Copy> Knob<T> {
    pub fn new(value: T) -> Self {
        Self { home: value, live: value }
    }

    pub fn home(&self) -> T {
        self.home
    }

    pub fn live(&self) -> T {
        self.live
    }

    pub fn set(&mut self, value: T) {
        self.home = value;
        self.live = value;
    }

    pub fn set_live(&mut self, value: T) {
        self.live = value;
    }

    pub fn home_mut(&mut self) -> &mut T {
        &mut self.home
    }

    pub fn live_mut(&mut self) -> &mut T {
        &mut self.live
    }

    pub fn restore(&mut self) {
        self.live = self.home;
    }

    pub fn commit(&mut self) {
        self.home = self.live;
    }
}
