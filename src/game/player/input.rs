use bevy::prelude::*;

use crate::screens::Screen;

/// Keys and buttons feeding the parkour controls.
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct ParkourBindings {
    pub forward: Vec<KeyCode>,
    pub back: Vec<KeyCode>,
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub sprint: Vec<KeyCode>,
    pub crouch: Vec<KeyCode>,
    pub ability: Vec<KeyCode>,
    pub cancel: Vec<KeyCode>,
    pub cancel_button: MouseButton,
}

impl Default for ParkourBindings {
    fn default() -> Self {
        Self {
            forward: vec![KeyCode::KeyW, KeyCode::ArrowUp],
            back: vec![KeyCode::KeyS, KeyCode::ArrowDown],
            left: vec![KeyCode::KeyA, KeyCode::ArrowLeft],
            right: vec![KeyCode::KeyD, KeyCode::ArrowRight],
            sprint: vec![KeyCode::ShiftLeft, KeyCode::ShiftRight],
            crouch: vec![KeyCode::KeyC, KeyCode::ControlLeft],
            ability: vec![KeyCode::Space],
            cancel: vec![KeyCode::KeyQ],
            cancel_button: MouseButton::Right,
        }
    }
}

/// Control state sampled every frame and consumed on the fixed step.
///
/// Axes hold their latest value. Presses are latched until the next fixed
/// step picks them up, so a tap between two steps is never lost.
#[derive(Resource, Debug, Default, Clone, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct ParkourInput {
    pub forward: f32,
    pub right: f32,
    pub sprint: f32,
    pub crouch: f32,
    pub ability_pressed: bool,
    pub cancel_pressed: bool,
}

impl ParkourInput {
    /// Hands out the latched presses and clears them.
    pub fn take_presses(&mut self) -> (bool, bool) {
        (
            std::mem::take(&mut self.ability_pressed),
            std::mem::take(&mut self.cancel_pressed),
        )
    }
}

fn axis(keyboard: &ButtonInput<KeyCode>, positive: &[KeyCode], negative: &[KeyCode]) -> f32 {
    let mut value = 0.0;
    if keyboard.any_pressed(positive.iter().copied()) {
        value += 1.0;
    }
    if keyboard.any_pressed(negative.iter().copied()) {
        value -= 1.0;
    }
    value
}

fn held(keyboard: &ButtonInput<KeyCode>, keys: &[KeyCode]) -> f32 {
    if keyboard.any_pressed(keys.iter().copied()) {
        1.0
    } else {
        0.0
    }
}

fn read_parkour_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    bindings: Res<ParkourBindings>,
    mut input: ResMut<ParkourInput>,
) {
    input.forward = axis(&keyboard, &bindings.forward, &bindings.back);
    input.right = axis(&keyboard, &bindings.right, &bindings.left);
    input.sprint = held(&keyboard, &bindings.sprint);
    input.crouch = held(&keyboard, &bindings.crouch);

    if keyboard.any_just_pressed(bindings.ability.iter().copied()) {
        input.ability_pressed = true;
    }
    if keyboard.any_just_pressed(bindings.cancel.iter().copied())
        || mouse.just_pressed(bindings.cancel_button)
    {
        input.cancel_pressed = true;
    }
}

fn clear_parkour_input(mut input: ResMut<ParkourInput>) {
    *input = ParkourInput::default();
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<ParkourBindings>();
    app.register_type::<ParkourInput>();
    app.init_resource::<ParkourBindings>();
    app.init_resource::<ParkourInput>();

    app.add_systems(
        PreUpdate,
        read_parkour_input
            .after(bevy::input::InputSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
    app.add_systems(OnExit(Screen::Gameplay), clear_parkour_input);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_keys_cancel_out() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyW);
        keyboard.press(KeyCode::KeyS);

        let bindings = ParkourBindings::default();
        assert_eq!(axis(&keyboard, &bindings.forward, &bindings.back), 0.0);

        keyboard.release(KeyCode::KeyS);
        assert_eq!(axis(&keyboard, &bindings.forward, &bindings.back), 1.0);
    }

    #[test]
    fn presses_are_handed_out_once() {
        let mut input = ParkourInput {
            ability_pressed: true,
            ..default()
        };

        assert_eq!(input.take_presses(), (true, false));
        assert_eq!(input.take_presses(), (false, false));
    }
}
