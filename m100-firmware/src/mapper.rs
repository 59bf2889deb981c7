use dual_action::{DualRoleResolver, Gate, Role};
use embassy_futures::select::{select, select3, Either, Either3};
use embassy_sync::{
    blocking_mutex::raw::{NoopRawMutex, RawMutex},
    channel::Channel,
    signal::Signal,
};
use embassy_time::{Instant, Timer};
use heapless::Deque;
use m100_common::{keycodes::key_range, settings::Settings};

use crate::{
    layout::{Action, HoldRole, KeyPlusMod, Keymap, LayerStack},
    leds::{HostPowerEvent, LedCommand, LedEvent, Leds},
    scan::{KeyPosition, KeyScannerChannel, TimedScanKey},
};
use combos::{ComboDetector, ComboHandler, ComboOutcome};
use macros::{KeyState, MacroHandler, MacroRegistry, MacroRun};

pub mod combos;
pub mod dual_action;
pub mod macros;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    Basic(u8, bool),
    Modifiers(u8, bool),
    Consumer(u16),
    SysCtl(u16),
    Mouse(u8, bool),
    Led(LedEvent),
    /// Switch the host between boot and report keyboard protocol.
    ToggleProtocol,
    Clear,
}
impl KeyEvent {
    fn consumer(kc: u16, is_down: bool) -> Self {
        let kc = kc - key_range::CONSUMER_MIN;
        Self::Consumer(if is_down { kc } else { 0 })
    }

    fn sys_ctl(kc: u16, is_down: bool) -> Self {
        let kc = kc - key_range::SYS_CTL_MIN + key_range::SYS_CTL_BASE;
        Self::SysCtl(if is_down { kc } else { 0 })
    }

    fn basic(kc8: u8, is_down: bool) -> Self {
        Self::Basic(kc8, is_down)
    }

    fn mouse(kc: u16, is_down: bool) -> Self {
        Self::Mouse((kc - key_range::MOUSE_MIN) as u8, is_down)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    Full,
    Empty,
    TooManyKeys,
    OutOfRange,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlMessage {
    HostPower(HostPowerEvent),
    Exit,
}
#[derive(Default)]
pub struct ControlSignal(Signal<NoopRawMutex, ControlMessage>);
impl ControlSignal {
    pub fn host_power(&self, event: HostPowerEvent) {
        self.0.signal(ControlMessage::HostPower(event));
    }

    pub fn exit(&self) {
        self.0.signal(ControlMessage::Exit);
    }
}

/// Output sink for [KeyEvent]s plus the control signal for the processor's run loop.
pub struct ReportChannel<M: RawMutex, const N: usize>(Channel<M, KeyEvent, N>, ControlSignal);
impl<M: RawMutex, const N: usize> Default for ReportChannel<M, N> {
    fn default() -> Self {
        Self(Channel::new(), ControlSignal::default())
    }
}
impl<M: RawMutex, const N: usize> ReportChannel<M, N> {
    pub async fn receive(&self) -> KeyEvent {
        self.0.receive().await
    }

    pub fn try_receive(&self) -> Option<KeyEvent> {
        self.0.try_receive().ok()
    }

    pub fn control(&self) -> &ControlSignal {
        &self.1
    }

    async fn wait_control(&self) -> ControlMessage {
        self.1 .0.wait().await
    }

    fn report(&self, message: KeyEvent) {
        if self.0.try_send(message).is_err() {
            crate::warn!("report channel full");
            self.clear_reports();
            let _ = self.0.try_send(KeyEvent::Clear);
        }
    }

    fn clear_reports(&self) {
        self.0.clear();
    }
}

const MIN_REPORT_BUFFER_SIZE: usize = 4;
const PENDING_SIZE: usize = 2 * dual_action::QUEUE_SIZE;

const fn assert_sizes<const REPORT_BUFFER_SIZE: usize>() -> bool {
    assert!(REPORT_BUFFER_SIZE >= MIN_REPORT_BUFFER_SIZE);
    true
}

/// Turns debounced key switch events into [KeyEvent] reports: layer resolution, dual-role keys,
/// magic combos, macros and LED control.
pub struct EventProcessor<
    'c,
    const LAYERS: usize,
    const ROWS: usize,
    const COLS: usize,
    M: RawMutex,
    const REPORT_BUFFER_SIZE: usize,
> {
    keymap: &'c Keymap<LAYERS, ROWS, COLS>,
    stack: LayerStack,
    /// The action each held key resolved to when pressed.
    active_actions: [[Option<Action>; COLS]; ROWS],
    dual_role: DualRoleResolver<ROWS, COLS>,
    combos: ComboDetector<'c, ROWS, COLS>,
    macros: MacroRegistry<'c>,
    macro_running: Option<MacroRun<'c>>,
    /// Events released by a dual-role resolution that wait behind a running macro.
    pending: Deque<TimedScanKey, PENDING_SIZE>,
    leds: Leds<'c>,
    modifier_count: [i8; 8],
    qukeys_overlap: u8,
    report_channel: &'c ReportChannel<M, REPORT_BUFFER_SIZE>,
    now: u64,
}

impl<
        'c,
        const LAYERS: usize,
        const ROWS: usize,
        const COLS: usize,
        M: RawMutex,
        const REPORT_BUFFER_SIZE: usize,
    > EventProcessor<'c, LAYERS, ROWS, COLS, M, REPORT_BUFFER_SIZE>
{
    const OKAY: bool = assert_sizes::<REPORT_BUFFER_SIZE>();
    pub fn new(
        keymap: &'c Keymap<LAYERS, ROWS, COLS>,
        report_channel: &'c ReportChannel<M, REPORT_BUFFER_SIZE>,
    ) -> Self {
        assert!(Self::OKAY);
        let settings = Settings::default();
        Self {
            keymap,
            stack: LayerStack::new(),
            active_actions: [[None; COLS]; ROWS],
            dual_role: DualRoleResolver::default(),
            combos: ComboDetector::default(),
            macros: MacroRegistry::default(),
            macro_running: None,
            pending: Deque::new(),
            leds: Leds::new(&[]),
            modifier_count: Default::default(),
            qukeys_overlap: settings.qukeys_overlap(),
            report_channel,
            now: 0,
        }
    }

    pub fn with_leds(mut self, leds: Leds<'c>) -> Self {
        self.leds = leds;
        self
    }

    pub fn register_macro(
        &mut self,
        id: u8,
        handler: &'c dyn MacroHandler,
    ) -> Result<(), RegistryError> {
        self.macros.register(id, handler)
    }

    pub fn register_combo(
        &mut self,
        keys: &[KeyPosition],
        handler: &'c dyn ComboHandler,
    ) -> Result<(), RegistryError> {
        self.combos.register(keys, handler)?;
        crate::debug!("{} combos registered", self.combos.len());
        Ok(())
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.qukeys_overlap = settings.qukeys_overlap();
        self.leds.apply_settings(settings);
    }

    pub fn layer_stack(&self) -> &LayerStack {
        &self.stack
    }

    pub fn leds(&self) -> &Leds<'c> {
        &self.leds
    }

    pub fn is_macro_running(&self) -> bool {
        self.macro_running.is_some()
    }

    /// Forget all held keys, layers and pending macro output and report [KeyEvent::Clear].
    pub fn clear_all(&mut self) {
        for r in self.active_actions.iter_mut() {
            for c in r.iter_mut() {
                *c = None;
            }
        }
        for m in self.modifier_count.iter_mut() {
            *m = 0;
        }
        self.macro_running = None;
        self.pending.clear();
        self.stack.clear();
        self.dual_role.clear();
        self.combos.clear();
        self.report_channel.clear_reports();
        self.report(KeyEvent::Clear);
    }

    pub async fn run<const SCANNER_BUFFER_SIZE: usize>(
        &mut self,
        key_scan_channel: &'c KeyScannerChannel<M, SCANNER_BUFFER_SIZE>,
    ) -> ControlMessage {
        loop {
            // finish typing and replaying before taking the next key
            while self.has_backlog() {
                if self.macro_running.is_some() {
                    self.wait_for_report_capacity().await;
                }
                self.resume();
            }

            let event = match self.leds.idle_deadline() {
                Some(deadline) => {
                    select3(
                        key_scan_channel.receive(),
                        self.report_channel.wait_control(),
                        Timer::at(Instant::from_millis(deadline)),
                    )
                    .await
                }
                None => match select(
                    key_scan_channel.receive(),
                    self.report_channel.wait_control(),
                )
                .await
                {
                    Either::First(k) => Either3::First(k),
                    Either::Second(ctl) => Either3::Second(ctl),
                },
            };

            self.now = Instant::now().as_millis();

            match event {
                Either3::First(scan_key) => self.key_switch(TimedScanKey(scan_key, self.now)),
                Either3::Second(ControlMessage::HostPower(event)) => self.host_power(event),
                Either3::Second(ControlMessage::Exit) => return ControlMessage::Exit,
                Either3::Third(()) => self.check_time(),
            }
        }
    }

    pub fn host_power(&mut self, event: HostPowerEvent) {
        crate::info!("host power {:?}", event);
        for ev in self.leds.host_power(event, self.now) {
            self.report(KeyEvent::Led(ev));
        }
    }

    fn check_time(&mut self) {
        for ev in self.leds.check_idle(self.now) {
            self.report(KeyEvent::Led(ev));
        }
    }

    /// Process one key switch change. Physical state (combos, LED activity) is updated first, then
    /// the event goes through the dual-role gate to layer resolution and dispatch.
    pub fn key_switch(&mut self, k: TimedScanKey) {
        let pos = k.position();
        if !self.keymap.contains(pos) {
            crate::warn!("key outside keymap {:?}", pos);
            return;
        }
        self.now = k.time();

        if k.is_down() {
            for ev in self.leds.key_activity(k.time()) {
                self.report(KeyEvent::Led(ev));
            }
            for handler in self.combos.key_down(pos) {
                self.combo_outcome(handler.activate());
            }
        } else {
            self.combos.key_up(pos);
        }

        if self.pending.is_empty() {
            self.dispatch(k);
        } else if let Err(k) = self.pending.push_back(k) {
            crate::warn!("pending queue full; processing {:?} now", k);
            self.dispatch(k);
        }
        self.replay();
    }

    fn dispatch(&mut self, k: TimedScanKey) {
        match self.dual_role.key_switch(k, self.qukeys_overlap) {
            Gate::Pass => self.key_switch_1(k),
            Gate::Queued => {}
            Gate::Resolved { pos, role, then } => {
                crate::debug!("dual-role {:?} resolved {:?}", pos, role);
                self.run_role(pos, role, true);
                // the held back events go ahead of anything already pending
                if let Some(then) = then {
                    self.push_pending_front(then);
                }
                let mut queue = self.dual_role.take_queue();
                while let Some(q) = queue.pop_back() {
                    self.push_pending_front(q);
                }
            }
        }
    }

    fn push_pending_front(&mut self, k: TimedScanKey) {
        if let Err(k) = self.pending.push_front(k) {
            crate::warn!("pending queue full; processing {:?} now", k);
            self.dispatch(k);
        }
    }

    /// Process held back events in order, pausing while a macro is typing.
    fn replay(&mut self) {
        while self.macro_running.is_none() {
            let Some(k) = self.pending.pop_front() else {
                return;
            };
            self.dispatch(k);
        }
    }

    /// True while macro output or held back events remain to be processed.
    pub fn has_backlog(&self) -> bool {
        self.macro_running.is_some() || !self.pending.is_empty()
    }

    /// Type the next part of a running macro or, once it is done, continue with held back events.
    pub fn resume(&mut self) {
        if self.macro_running.is_some() {
            self.next_macro_step();
        } else {
            self.replay();
        }
    }

    fn key_switch_1(&mut self, k: TimedScanKey) {
        let pos = k.position();
        let (r, c) = (pos.row as usize, pos.col as usize);
        if k.is_down() {
            let action = self.keymap.resolve(pos, &self.stack);
            self.active_actions[r][c] = action;
            if let Some(action) = action {
                self.run_action(pos, action, true, k.time());
            }
        } else if let Some(action) = self.active_actions[r][c].take() {
            self.run_action(pos, action, false, k.time());
        }
    }

    fn run_action(&mut self, pos: KeyPosition, action: Action, is_down: bool, time: u64) {
        match action {
            Action::Key(kpm) => self.run_key(kpm, is_down),
            Action::ShiftToLayer(layer) => {
                if is_down {
                    self.stack.shift(layer, pos);
                } else {
                    self.stack.unshift(pos);
                }
            }
            Action::LockLayer(layer) => {
                if is_down {
                    let locked = self.stack.toggle_lock(layer);
                    crate::debug!("layer {} locked {}; top {}", layer, locked, self.stack.top());
                }
            }
            Action::DualRole { tap, hold } => {
                if is_down {
                    self.dual_role.start(pos, time, tap, hold);
                } else if let Some(role) = self.dual_role.release(pos) {
                    self.run_role(pos, role, false);
                }
            }
            Action::Macro(id) => self.run_macro(
                id,
                if is_down {
                    KeyState::ToggledOn
                } else {
                    KeyState::ToggledOff
                },
            ),
            Action::ComboMember | Action::Transparent | Action::Blocked => {}
        }
    }

    fn run_role(&mut self, pos: KeyPosition, role: Role, is_down: bool) {
        match role {
            Role::Primary(tap) => self.run_key(tap, is_down),
            Role::Secondary(HoldRole::Modifier(bits)) => {
                self.write_modifiers(bits, if is_down { 1 } else { -1 })
            }
            Role::Secondary(HoldRole::Layer(layer)) => {
                if is_down {
                    self.stack.shift(layer, pos);
                } else {
                    self.stack.unshift(pos);
                }
            }
        }
    }

    fn run_key(&mut self, kpm: KeyPlusMod, is_down: bool) {
        if is_down {
            self.write_modifiers(kpm.1, 1);
            self.run_code(kpm.0, true);
        } else {
            self.run_code(kpm.0, false);
            self.write_modifiers(kpm.1, -1);
        }
    }

    fn run_code(&mut self, code: u16, is_down: bool) {
        match code {
            key_range::MODIFIER_MIN..=key_range::MODIFIER_MAX => {
                let idx = code - key_range::MODIFIER_MIN;
                self.write_modifiers(1 << idx, if is_down { 1 } else { -1 });
            }
            key_range::BASIC_MIN..=key_range::BASIC_MAX => {
                self.report(KeyEvent::basic(code as u8, is_down));
            }
            key_range::CONSUMER_MIN..=key_range::CONSUMER_MAX => {
                self.report(KeyEvent::consumer(code, is_down));
            }
            key_range::SYS_CTL_MIN..=key_range::SYS_CTL_MAX => {
                self.report(KeyEvent::sys_ctl(code, is_down));
            }
            key_range::MOUSE_MIN..=key_range::MOUSE_MAX => {
                self.report(KeyEvent::mouse(code, is_down));
            }
            key_range::FIRMWARE_MIN..=key_range::FIRMWARE_MAX => {
                if is_down {
                    self.firmware_action(code);
                }
            }
            _ => {
                crate::debug!("unmapped code {}", code);
            }
        }
    }

    fn firmware_action(&mut self, code: u16) {
        let command = match code {
            key_range::FW_LED_NEXT => LedCommand::Next,
            key_range::FW_LED_PREV => LedCommand::Previous,
            key_range::FW_LED_TOGGLE => LedCommand::Toggle,
            _ => {
                crate::info!("not yet supported: {}", code);
                return;
            }
        };
        self.led_command(command);
    }

    fn led_command(&mut self, command: LedCommand) {
        for ev in self.leds.command(command) {
            self.report(KeyEvent::Led(ev));
        }
    }

    fn combo_outcome(&mut self, outcome: ComboOutcome) {
        match outcome {
            ComboOutcome::Nothing => {}
            ComboOutcome::Report(ev) => self.report(ev),
            ComboOutcome::Led(command) => self.led_command(command),
        }
    }

    fn run_macro(&mut self, id: u8, state: KeyState) {
        let handler = self.macros.get(id);
        if let Some(run) = MacroRun::new(handler.handle(state)) {
            if self.macro_running.is_some() {
                crate::warn!("macro {} replaces running macro", id);
            }
            self.macro_running = Some(run);
            self.next_macro_step();
        }
    }

    /// Type macro keys while the report channel has room. At least one key is typed per call.
    fn next_macro_step(&mut self) {
        loop {
            let Some(run) = self.macro_running.as_mut() else {
                return;
            };
            let Some(key) = run.next_key() else {
                self.macro_running = None;
                return;
            };
            self.run_key(key, true);
            self.run_key(key, false);
            if !self.room_to_report() {
                return;
            }
        }
    }

    /// Change the state of a modifier keeping count by accumulating `count` for each modifier. Only
    /// reports the state if it crosses the 0 to 1 threshold. A single changed modifier is reported as
    /// its basic key code, several at once as [KeyEvent::Modifiers].
    fn write_modifiers(&mut self, modifiers: u8, count: i8) {
        if modifiers == 0 {
            return;
        }
        let down = count > 0;
        let mut changed_bits = 0;
        let mut changed = 0;
        let mut last = 0;
        for i in 0..8 {
            if modifiers & (1 << i) != 0 {
                let before = self.modifier_count[i] > 0;
                self.modifier_count[i] = self.modifier_count[i].saturating_add(count).max(0);
                if before != (self.modifier_count[i] > 0) {
                    changed_bits |= 1 << i;
                    changed += 1;
                    last = i;
                }
            }
        }
        match changed {
            0 => {}
            1 => self.report(KeyEvent::basic(
                key_range::MODIFIER_MIN as u8 + last as u8,
                down,
            )),
            _ => self.report(KeyEvent::Modifiers(changed_bits, down)),
        }
    }

    fn report(&mut self, message: KeyEvent) {
        self.report_channel.report(message);
    }

    fn room_to_report(&self) -> bool {
        self.report_channel.0.free_capacity() >= MIN_REPORT_BUFFER_SIZE
    }

    async fn wait_for_report_capacity(&self) {
        for _ in 0..10 {
            if self.room_to_report() {
                break;
            }
            Timer::after_millis(16).await;
        }
    }
}

#[cfg(test)]
#[path = "mapper_test.rs"]
mod test;
