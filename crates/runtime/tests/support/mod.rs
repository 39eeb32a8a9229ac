//! In-memory host used by the runtime integration tests.
//!
//! `TestHost` keeps a tiny world (actors, items, shared stat blocks, skill
//! levels) and publishes instruction bodies for the operations dual-wield
//! rewrites. Those bodies are executed by a small stack machine, so the
//! installed rewrites change what the host actually does.
#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use dualwield_content::{MemoryResources, OFFHAND_ICON, SKILL_ICONS};
use dualwield_core::{
    Actor, ActorId, AnimationClip, AnimatorController, Attack, AttackCue, ClipBundle, ClipManifest,
    DamageTypes, DualWieldConfig, HitPointType, Host, HostError, ItemData, ItemId, ItemType,
    ItemVisual, PrefabHash, SharedData, SharedId, SkillDef, SkillId, SkillType, Transform,
    WeaponTrail, stable_hash,
};
use dualwield_runtime::hooks::rewrites::{
    ABS, ATTACK_ANGLE, EULER, HIDDEN_LEFT, HIDDEN_RIGHT, ITEM_SHARED, ITEM_TYPE, ONE_HANDED_TYPE,
};
use dualwield_runtime::hooks::{
    AttachItemArgs, CheatSkillArgs, DoMeleeAttack, EquipItem, EquipItemArgs, ShowHandItems,
    SkillArgs, SkillChangeArgs, TriggerArgs, WeaponTrailsArgs,
};
use dualwield_runtime::{
    Assets, HostRuntime, InjectedCall, NestedEquip, Plugin, Session, StartupError,
};
use hook_registry::{Instruction, InstructionSequence, Label, Operation, OperationId};

pub const PLAYER: ActorId = ActorId(1);
pub const NPC: ActorId = ActorId(2);

/// What the host's own skill roll returns.
pub const HOST_SKILL_ROLL: f32 = 0.42;
/// Stamina the host charges when dual-wield does not take over.
pub const HOST_STAMINA: f32 = 12.0;
/// Sweep angle every test attack starts with.
pub const ATTACK_ANGLE_DEGREES: f32 = 90.0;

/// One melee sweep as the host performed it.
#[derive(Clone, Debug, PartialEq)]
pub struct Swing {
    pub actor: ActorId,
    pub weapon: Option<ItemId>,
    pub angle: f32,
    pub hit_point_type: HitPointType,
    pub skill: SkillType,
    pub damage: f32,
    pub backstab: f32,
    pub attack_force: f32,
    pub sweep_start: f32,
    pub rays: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Value {
    Actor(ActorId),
    Attack(ActorId),
    Item(Option<ItemId>),
    Shared(Option<SharedId>),
    I32(i32),
    F32(f32),
    Bool(bool),
}

fn pop(stack: &mut Vec<Value>) -> Value {
    stack.pop().expect("stack underflow")
}

fn pop_f32(stack: &mut Vec<Value>) -> f32 {
    match pop(stack) {
        Value::F32(v) => v,
        other => panic!("expected a float, got {other:?}"),
    }
}

fn pop_item(stack: &mut Vec<Value>) -> Option<ItemId> {
    match pop(stack) {
        Value::Item(item) => item,
        other => panic!("expected an item, got {other:?}"),
    }
}

/// Host's numeric code of an item type.
fn type_code(item_type: ItemType) -> i32 {
    match item_type {
        ItemType::Material => 1,
        ItemType::OneHandedWeapon => ONE_HANDED_TYPE,
        ItemType::Bow => 4,
        ItemType::Shield => 5,
        ItemType::TwoHandedWeapon => 14,
        ItemType::Torch => 15,
        ItemType::Tool => 19,
    }
}

pub fn prefab_hash(prefab: &str) -> PrefabHash {
    PrefabHash(stable_hash(prefab))
}

/// Stat block of each prefab the tests spawn.
#[rustfmt::skip]
fn catalog(prefab: &str) -> SharedData {
    let weapon = |item_type, skill, primary: &str, secondary: &str, damages, force| SharedData {
        name: prefab.to_owned(),
        item_type,
        skill,
        damages,
        backstab_bonus: 3.0,
        attack_force: force,
        attack: AttackCue::new(primary),
        secondary_attack: AttackCue::new(secondary),
    };
    let slash = |v| DamageTypes {
        slash: v,
        ..Default::default()
    };
    let blunt = |v| DamageTypes {
        blunt: v,
        ..Default::default()
    };
    use ItemType::*;
    match prefab {
        "SwordIron" => weapon(OneHandedWeapon, SkillType::Swords, "swing_longsword", "sword_secondary", slash(50.0), 40.0),
        "SwordBronze" => weapon(OneHandedWeapon, SkillType::Swords, "swing_longsword", "sword_secondary", slash(30.0), 40.0),
        "AxeBronze" => weapon(OneHandedWeapon, SkillType::Axes, "swing_axe", "axe_secondary", slash(40.0), 40.0),
        "AxeIron" => weapon(OneHandedWeapon, SkillType::Axes, "swing_axe", "axe_secondary", slash(60.0), 40.0),
        "MaceIron" => weapon(OneHandedWeapon, SkillType::Clubs, "swing_axe", "mace_secondary", blunt(60.0), 80.0),
        "KnifeFlint" => weapon(OneHandedWeapon, SkillType::Knives, "knife_stab", "knife_secondary", slash(20.0), 10.0),
        "ShieldWood" => weapon(Shield, SkillType::Blocking, "", "", DamageTypes::default(), 0.0),
        "Battleaxe" => weapon(TwoHandedWeapon, SkillType::Axes, "battleaxe_attack", "battleaxe_secondary", slash(70.0), 80.0),
        "Torch" => weapon(Torch, SkillType::Clubs, "swing_torch", "", blunt(5.0), 20.0),
        other => panic!("no catalog entry for {other}"),
    }
}

/// Clips of the stock player controller.
pub fn base_controller() -> AnimatorController {
    let clip = AnimationClip::new;
    AnimatorController::new(
        "player",
        vec![
            clip("fight idle", "idle"),
            clip("Block idle", "block"),
            clip("Attack1", "sword_attack1"),
            clip("Attack2", "sword_attack2"),
            clip("Attack3", "sword_attack3"),
            clip("Sword-Attack-R4", "sword_special"),
            clip("axe_swing", "axe_attack1"),
            clip("Axe combo 2", "axe_attack2"),
            clip("Axe combo 3", "axe_attack3"),
            clip("Axe Secondary Attack", "axe_special"),
            clip("MaceAltAttack", "mace_special"),
            clip("knife_slash0", "knife_attack1"),
            clip("walk", "walk"),
        ],
    )
}

fn equip_body() -> InstructionSequence {
    use Instruction::*;
    InstructionSequence::new(vec![
        LoadArg(1),
        LoadField(ITEM_SHARED),
        LoadField(ITEM_TYPE),
        LoadI32(ONE_HANDED_TYPE),
        BranchNotEqual(Label(0)),
        Op("equip_right"),
        Branch(Label(1)),
        MarkLabel(Label(0)),
        Op("equip_by_type"),
        MarkLabel(Label(1)),
        Return,
    ])
}

fn show_hand_items_body() -> InstructionSequence {
    use Instruction::*;
    InstructionSequence::new(vec![
        LoadArg(0),
        LoadField(HIDDEN_LEFT),
        Op("equip_hidden"),
        LoadArg(0),
        LoadField(HIDDEN_RIGHT),
        Op("equip_hidden"),
        Return,
    ])
}

fn melee_body() -> InstructionSequence {
    use Instruction::*;
    InstructionSequence::new(vec![
        LoadArg(0),
        LoadField(ATTACK_ANGLE),
        LoadF32(0.5),
        Op("mul"),
        Negate,
        LoadF32(0.0),
        Call(EULER),
        Op("sweep_start"),
        LoadArg(0),
        LoadField(ATTACK_ANGLE),
        Op("ray_count"),
        Return,
    ])
}

pub struct TestHost {
    pub actors: HashMap<ActorId, Actor>,
    pub items: HashMap<ItemId, ItemData>,
    pub shared: HashMap<SharedId, SharedData>,
    prefabs: HashMap<PrefabHash, (String, SharedId)>,
    pub local_player: Option<ActorId>,
    pub skill_levels: HashMap<(ActorId, SkillType), f32>,
    pub bodies: HashMap<OperationId, InstructionSequence>,

    pub swings: Vec<Swing>,
    /// Melee sweeps with this weapon abort.
    pub fail_melee_with: Option<ItemId>,
    pub aborted: Vec<HostError>,
    pub unequipped: Vec<ItemId>,
    pub shown: Vec<ItemId>,
    pub triggers: Vec<(ActorId, String)>,
    pub notifications: Vec<(ActorId, String)>,
    pub console: Vec<String>,
    pub localized: HashMap<String, String>,
    pub skill_defs: Vec<SkillDef>,
    pub tab_completion: HashMap<String, Vec<String>>,
    pub animator_refreshes: usize,
    pub setups: usize,
    pub fixed_updates: usize,
    pub terminal_inits: usize,
    next_item: u32,
}

impl TestHost {
    /// A local player and one NPC, both empty-handed.
    pub fn new() -> Self {
        let mut host = Self {
            actors: HashMap::new(),
            items: HashMap::new(),
            shared: HashMap::new(),
            prefabs: HashMap::new(),
            local_player: Some(PLAYER),
            skill_levels: HashMap::new(),
            bodies: HashMap::from([
                (EquipItem::ID, equip_body()),
                (ShowHandItems::ID, show_hand_items_body()),
                (DoMeleeAttack::ID, melee_body()),
            ]),
            swings: Vec::new(),
            fail_melee_with: None,
            aborted: Vec::new(),
            unequipped: Vec::new(),
            shown: Vec::new(),
            triggers: Vec::new(),
            notifications: Vec::new(),
            console: Vec::new(),
            localized: HashMap::new(),
            skill_defs: Vec::new(),
            tab_completion: HashMap::new(),
            animator_refreshes: 0,
            setups: 0,
            fixed_updates: 0,
            terminal_inits: 0,
            next_item: 1,
        };
        let controller = Arc::new(base_controller());
        host.actors.insert(PLAYER, Actor::new(PLAYER, true, Arc::clone(&controller)));
        host.actors.insert(NPC, Actor::new(NPC, false, controller));
        host
    }

    /// Spawns an item of `prefab`. Items of one prefab share a stat block.
    pub fn spawn(&mut self, prefab: &str) -> ItemId {
        let hash = prefab_hash(prefab);
        let shared = match self.prefabs.get(&hash) {
            Some((_, id)) => *id,
            None => {
                let id = SharedId(self.shared.len() as u32 + 1);
                self.shared.insert(id, catalog(prefab));
                self.prefabs.insert(hash, (prefab.to_owned(), id));
                id
            }
        };
        let id = ItemId(self.next_item);
        self.next_item += 1;
        self.items.insert(
            id,
            ItemData {
                id,
                prefab: prefab.to_owned(),
                shared,
                equipped: false,
            },
        );
        id
    }

    pub fn player(&self) -> &Actor {
        &self.actors[&PLAYER]
    }

    pub fn hands(&self, actor: ActorId) -> (Option<ItemId>, Option<ItemId>) {
        let state = &self.actors[&actor];
        (state.right_item, state.left_item)
    }

    pub fn shared_of(&self, item: ItemId) -> &SharedData {
        &self.shared[&self.items[&item].shared]
    }

    /// Puts items straight into the hands, bypassing the equip routine.
    pub fn hold(&mut self, actor: ActorId, right: Option<ItemId>, left: Option<ItemId>) {
        let state = self.actors.get_mut(&actor).expect("actor");
        state.right_item = right;
        state.left_item = left;
        for item in right.into_iter().chain(left) {
            self.items.get_mut(&item).expect("item").equipped = true;
        }
        self.sync_visual(actor);
    }

    /// Moves both hands into the hidden slots, as when the actor starts swimming.
    pub fn hide_hand_items(&mut self, actor: ActorId) {
        let state = self.actors.get_mut(&actor).expect("actor");
        state.hidden_right = state.right_item.take();
        state.hidden_left = state.left_item.take();
        self.sync_visual(actor);
    }

    /// Starts an attack with the right-hand weapon playing `clip`.
    ///
    /// `chain_level` is the combo step; `None` starts the secondary attack.
    pub fn start_attack(&mut self, actor: ActorId, clip: &str, chain_level: Option<u32>) {
        let state = &self.actors[&actor];
        let weapon = state.right_item;
        let (animation, chain_levels) = match (weapon.map(|w| self.shared_of(w)), chain_level) {
            (Some(shared), None) => (shared.secondary_attack.animation.clone(), 1),
            (Some(shared), Some(_)) => (shared.attack.animation.clone(), 3),
            (None, _) => (String::new(), 1),
        };

        let state = self.actors.get_mut(&actor).expect("actor");
        state.current_attack = Some(Attack {
            weapon,
            hit_point_type: HitPointType::Average,
            attack_angle: ATTACK_ANGLE_DEGREES,
            attack_animation: animation,
            chain_levels,
            current_chain_level: chain_level.unwrap_or(0),
        });
        state.animator.current_clip = Some(clip.to_owned());
        state.in_attack = true;
    }

    /// Mirrors the hands into the visual equipment component.
    pub fn sync_visual(&mut self, actor: ActorId) {
        let hash = |host: &Self, item: Option<ItemId>| {
            item.and_then(|i| host.items.get(&i)).map(|i| prefab_hash(&i.prefab))
        };
        let (right, left) = self.hands(actor);
        let (right, left) = (hash(self, right), hash(self, left));
        let visual = &mut self.actors.get_mut(&actor).expect("actor").visual;
        if visual.current_left != left {
            visual.left_instance = left.map(|_| ItemVisual {
                trails: vec![WeaponTrail::default(); 2],
            });
        }
        visual.current_right = right;
        visual.current_left = left;
    }

    pub fn set_skill_level(&mut self, actor: ActorId, skill: SkillType, level: f32) {
        self.skill_levels.insert((actor, skill), level);
    }

    pub fn skill_level(&self, actor: ActorId, skill: SkillType) -> f32 {
        self.skill_levels.get(&(actor, skill)).copied().unwrap_or(0.0)
    }

    fn load_field(&mut self, value: Value, field: &str) -> Value {
        match (field, value) {
            (ITEM_SHARED, Value::Item(item)) => {
                Value::Shared(item.and_then(|i| self.items.get(&i)).map(|i| i.shared))
            }
            (ITEM_TYPE, Value::Shared(shared)) => {
                let shared = shared.and_then(|s| self.shared.get(&s)).expect("shared data");
                Value::I32(type_code(shared.item_type))
            }
            (HIDDEN_LEFT, Value::Actor(actor)) => {
                Value::Item(self.actors.get_mut(&actor).and_then(|a| a.hidden_left.take()))
            }
            (HIDDEN_RIGHT, Value::Actor(actor)) => {
                Value::Item(self.actors.get_mut(&actor).and_then(|a| a.hidden_right.take()))
            }
            (ATTACK_ANGLE, Value::Attack(actor)) => {
                let attack = self.actors[&actor].current_attack.as_ref().expect("attack");
                Value::F32(attack.attack_angle)
            }
            (field, value) => panic!("cannot load {field} from {value:?}"),
        }
    }

    /// Runs the published body of `operation`. Instructions the machine does
    /// not know go to `custom`.
    fn execute(
        &mut self,
        operation: OperationId,
        args: &[Value],
        mut custom: impl FnMut(&mut Self, &Instruction, &mut Vec<Value>),
    ) {
        let body = self.bodies.get(&operation).cloned().expect("published body");
        let code = body.as_slice();
        let labels: HashMap<Label, usize> = code
            .iter()
            .enumerate()
            .filter_map(|(at, i)| match i {
                Instruction::MarkLabel(label) => Some((*label, at)),
                _ => None,
            })
            .collect();

        let mut stack = Vec::new();
        let mut pc = 0;
        while pc < code.len() {
            let instruction = &code[pc];
            pc += 1;
            match instruction {
                Instruction::LoadArg(n) => stack.push(args[*n as usize]),
                Instruction::LoadI32(v) => stack.push(Value::I32(*v)),
                Instruction::LoadF32(v) => stack.push(Value::F32(*v)),
                Instruction::LoadField(field) => {
                    let value = pop(&mut stack);
                    stack.push(self.load_field(value, field));
                }
                Instruction::Negate => {
                    let v = pop_f32(&mut stack);
                    stack.push(Value::F32(-v));
                }
                Instruction::Call(method) if *method == ABS => {
                    let v = pop_f32(&mut stack);
                    stack.push(Value::F32(v.abs()));
                }
                Instruction::Branch(label) => pc = labels[label],
                Instruction::BranchIfTrue(label) => {
                    if pop(&mut stack) == Value::Bool(true) {
                        pc = labels[label];
                    }
                }
                Instruction::BranchIfFalse(label) => {
                    if pop(&mut stack) == Value::Bool(false) {
                        pc = labels[label];
                    }
                }
                Instruction::BranchNotEqual(label) => {
                    let (b, a) = (pop(&mut stack), pop(&mut stack));
                    if a != b {
                        pc = labels[label];
                    }
                }
                Instruction::BranchLessOrEqual(label) => {
                    let (b, a) = (pop_f32(&mut stack), pop_f32(&mut stack));
                    if a <= b {
                        pc = labels[label];
                    }
                }
                Instruction::MarkLabel(_) => {}
                Instruction::Return => break,
                other => custom(self, other, &mut stack),
            }
        }
    }

    fn equip_right(&mut self, actor: ActorId, item: ItemId, trigger_effects: bool) {
        let (right, left) = self.hands(actor);
        if right == Some(item) {
            return;
        }
        if let Some(current) = right {
            self.unequip_item(actor, current, trigger_effects);
        }
        if left == Some(item) {
            self.actors.get_mut(&actor).expect("actor").left_item = None;
        }
        self.actors.get_mut(&actor).expect("actor").right_item = Some(item);
        self.items.get_mut(&item).expect("item").equipped = true;
    }

    fn equip_by_type(&mut self, actor: ActorId, item: ItemId, trigger_effects: bool) {
        let (right, left) = self.hands(actor);
        match self.shared_of(item).item_type {
            ItemType::Shield | ItemType::Torch => {
                if let Some(current) = left.filter(|l| *l != item) {
                    self.unequip_item(actor, current, trigger_effects);
                }
                self.actors.get_mut(&actor).expect("actor").left_item = Some(item);
            }
            ItemType::TwoHandedWeapon | ItemType::Bow => {
                for current in right.into_iter().chain(left).filter(|i| *i != item) {
                    self.unequip_item(actor, current, trigger_effects);
                }
                self.actors.get_mut(&actor).expect("actor").right_item = Some(item);
            }
            ItemType::Tool => self.equip_right(actor, item, trigger_effects),
            // Reached only when the injected call took the item.
            ItemType::OneHandedWeapon | ItemType::Material => return,
        }
        self.items.get_mut(&item).expect("item").equipped = true;
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for TestHost {
    fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    fn item(&self, id: ItemId) -> Option<&ItemData> {
        self.items.get(&id)
    }

    fn item_mut(&mut self, id: ItemId) -> Option<&mut ItemData> {
        self.items.get_mut(&id)
    }

    fn shared(&self, id: SharedId) -> Option<&SharedData> {
        self.shared.get(&id)
    }

    fn shared_mut(&mut self, id: SharedId) -> Option<&mut SharedData> {
        self.shared.get_mut(&id)
    }

    fn prefab(&self, hash: PrefabHash) -> Option<(&str, SharedId)> {
        self.prefabs.get(&hash).map(|(name, id)| (name.as_str(), *id))
    }

    fn local_player(&self) -> Option<ActorId> {
        self.local_player
    }

    fn skill_factor(&self, actor: ActorId, skill: SkillType) -> f32 {
        self.skill_level(actor, skill) / 100.0
    }

    fn skill_level_mut(&mut self, actor: ActorId, skill: SkillId) -> Option<&mut f32> {
        Some(self.skill_levels.entry((actor, skill.skill_type())).or_insert(0.0))
    }

    fn reset_skill(&mut self, actor: ActorId, skill: SkillId) {
        self.skill_levels.insert((actor, skill.skill_type()), 0.0);
    }

    fn unequip_item(&mut self, actor: ActorId, item: ItemId, _trigger_effects: bool) {
        if let Some(state) = self.actors.get_mut(&actor) {
            if state.right_item == Some(item) {
                state.right_item = None;
            }
            if state.left_item == Some(item) {
                state.left_item = None;
            }
        }
        if let Some(data) = self.items.get_mut(&item) {
            data.equipped = false;
        }
        self.unequipped.push(item);
        self.sync_visual(actor);
    }

    fn do_melee_attack(&mut self, actor: ActorId) -> Result<(), HostError> {
        let attack = self
            .actors
            .get(&actor)
            .ok_or(HostError::ActorNotFound(actor))?
            .current_attack
            .clone()
            .ok_or(HostError::NoAttack(actor))?;
        if attack.weapon.is_some() && attack.weapon == self.fail_melee_with {
            return Err(HostError::AttackAborted("weapon slipped".into()));
        }

        let mut sweep_start = None;
        let mut rays = 0;
        self.execute(DoMeleeAttack::ID, &[Value::Attack(actor)], |_, instruction, stack| {
            match instruction {
                Instruction::Op("mul") => {
                    let (b, a) = (pop_f32(stack), pop_f32(stack));
                    stack.push(Value::F32(a * b));
                }
                Instruction::Call(method) if *method == EULER => {
                    let _y = pop_f32(stack);
                    let x = pop_f32(stack);
                    stack.push(Value::F32(x));
                }
                Instruction::Op("sweep_start") => sweep_start = Some(pop_f32(stack)),
                Instruction::Op("ray_count") => {
                    let angle = pop_f32(stack);
                    rays = if angle > 0.0 { (angle / 10.0).ceil() as u32 } else { 0 };
                }
                other => panic!("melee body cannot run {other:?}"),
            }
        });

        let shared = attack.weapon.map(|w| self.shared_of(w).clone()).unwrap_or_default();
        self.swings.push(Swing {
            actor,
            weapon: attack.weapon,
            angle: attack.attack_angle,
            hit_point_type: attack.hit_point_type,
            skill: shared.skill,
            damage: shared.damages.total(),
            backstab: shared.backstab_bonus,
            attack_force: shared.attack_force,
            sweep_start: sweep_start.expect("sweep start computed"),
            rays,
        });
        Ok(())
    }

    fn refresh_animator(&mut self, _actor: ActorId) {
        self.animator_refreshes += 1;
    }

    fn notify(&mut self, actor: ActorId, message: &str) {
        self.notifications.push((actor, message.to_owned()));
    }

    fn console_print(&mut self, message: &str) {
        self.console.push(message.to_owned());
    }

    fn add_localized_word(&mut self, key: &str, value: &str) {
        self.localized.insert(key.to_owned(), value.to_owned());
    }
}

impl HostRuntime for TestHost {
    fn equip_item(&mut self, args: &EquipItemArgs, injected: &mut InjectedCall<'_, Self>) -> bool {
        let EquipItemArgs {
            actor,
            item,
            trigger_effects,
        } = *args;
        let values = [
            Value::Actor(actor),
            Value::Item(Some(item)),
            Value::Bool(trigger_effects),
        ];
        self.execute(EquipItem::ID, &values, |host, instruction, stack| match instruction {
            Instruction::Op("equip_right") => host.equip_right(actor, item, trigger_effects),
            Instruction::Op("equip_by_type") => host.equip_by_type(actor, item, trigger_effects),
            Instruction::Hook(name) => {
                stack.truncate(stack.len() - 3);
                let taken = injected(host, *name);
                stack.push(Value::Bool(taken));
            }
            other => panic!("equip body cannot run {other:?}"),
        });
        self.sync_visual(actor);
        true
    }

    fn unequip_all_items(&mut self, actor: ActorId) {
        let (right, left) = self.hands(actor);
        for item in right.into_iter().chain(left) {
            self.unequip_item(actor, item, false);
        }
    }

    fn setup_equipment(&mut self, actor: ActorId) {
        self.setups += 1;
        self.sync_visual(actor);
    }

    fn player_start(&mut self, _actor: ActorId) {}

    fn show_hand_items(&mut self, actor: ActorId, equip: &mut NestedEquip<'_, Self>) {
        self.execute(ShowHandItems::ID, &[Value::Actor(actor)], |host, instruction, stack| {
            match instruction {
                Instruction::Op("equip_hidden") => {
                    if let Some(item) = pop_item(stack) {
                        host.shown.push(item);
                        equip(host, item);
                    }
                }
                other => panic!("show-hand-items body cannot run {other:?}"),
            }
        });
    }

    fn set_weapon_trails(&mut self, _args: &WeaponTrailsArgs) {}

    fn attach_item(&mut self, args: &AttachItemArgs) {
        if let Some(joint) = self
            .actors
            .get_mut(&args.actor)
            .and_then(|a| a.visual.joint_mut(args.joint))
        {
            joint.children.push(Transform::default());
        }
    }

    fn set_trigger(&mut self, args: &TriggerArgs) {
        self.triggers.push((args.actor, args.trigger.clone()));
    }

    fn on_attack_trigger(&mut self, actor: ActorId) {
        if let Err(error) = self.do_melee_attack(actor) {
            self.aborted.push(error);
        }
    }

    fn attack_stamina(&mut self, _actor: ActorId) -> f32 {
        HOST_STAMINA
    }

    fn random_skill_factor(&mut self, _args: &SkillArgs) -> f32 {
        HOST_SKILL_ROLL
    }

    fn animation_fixed_update(&mut self, _actor: ActorId) {
        self.fixed_updates += 1;
    }

    fn skill_def(&mut self, skill: SkillType) -> Option<SkillDef> {
        self.skill_defs
            .iter()
            .find(|d| d.skill.skill_type() == skill)
            .cloned()
    }

    fn is_skill_valid(&mut self, skill: SkillType) -> bool {
        !matches!(skill, SkillType::None | SkillType::Extension(_))
    }

    fn cheat_raise_skill(&mut self, args: &CheatSkillArgs) {
        self.console.push(format!("Skill not found {}", args.name));
    }

    fn cheat_reset_skill(&mut self, args: &CheatSkillArgs) {
        self.console.push(format!("Skill not found {}", args.name));
    }

    fn init_terminal(&mut self) {
        self.terminal_inits += 1;
        let host_skills: Vec<String> = ["Swords", "Axes", "Clubs", "Knives"]
            .into_iter()
            .map(String::from)
            .collect();
        for command in ["raiseskill", "resetskill"] {
            self.tab_completion
                .entry(command.to_owned())
                .or_insert_with(|| host_skills.clone());
        }
    }

    fn raise_skill(&mut self, args: &SkillChangeArgs) {
        *self.skill_levels.entry((args.actor, args.skill)).or_insert(0.0) += args.factor;
    }

    fn lower_skill_on_death(&mut self, args: &SkillChangeArgs) {
        let level = self.skill_levels.entry((args.actor, args.skill)).or_insert(0.0);
        *level -= *level * args.factor;
    }

    fn operation_body_mut(&mut self, operation: OperationId) -> Option<&mut InstructionSequence> {
        self.bodies.get_mut(&operation)
    }

    fn register_skill_def(&mut self, def: SkillDef) {
        self.skill_defs.push(def);
    }

    fn extend_tab_completion(&mut self, commands: &[&str], options: &[String]) {
        for command in commands {
            self.tab_completion
                .entry((*command).to_owned())
                .or_default()
                .extend(options.iter().cloned());
        }
    }
}

/// Animation bundle that holds every asset except the listed ones.
#[derive(Default)]
pub struct TestBundle {
    pub missing: Vec<String>,
}

impl ClipBundle for TestBundle {
    fn load(&self, asset: &str) -> Option<AnimationClip> {
        if self.missing.iter().any(|m| m == asset) {
            return None;
        }
        Some(AnimationClip::new(asset, format!("bundle/{asset}")))
    }
}

pub fn png() -> Vec<u8> {
    let mut bytes = Vec::new();
    image::RgbaImage::from_pixel(4, 4, image::Rgba([200, 40, 40, 255]))
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode png");
    bytes
}

pub fn icon_resources() -> MemoryResources {
    let mut resources = MemoryResources::new();
    for (_, name) in SKILL_ICONS {
        resources.insert(name, png());
    }
    resources.insert(OFFHAND_ICON, png());
    resources
}

pub fn install_with(
    host: TestHost,
    config: &DualWieldConfig,
    resources: &MemoryResources,
    bundle: &TestBundle,
) -> Result<Session<TestHost>, StartupError> {
    let manifest = ClipManifest::standard();
    Plugin::install(
        host,
        config,
        Assets {
            resources,
            clips: bundle,
            manifest: &manifest,
        },
    )
}

/// Installs dual-wield with default configuration and complete assets.
pub fn install(host: TestHost) -> Session<TestHost> {
    install_config(host, &DualWieldConfig::default())
}

pub fn install_config(host: TestHost, config: &DualWieldConfig) -> Session<TestHost> {
    install_with(host, config, &icon_resources(), &TestBundle::default())
        .expect("dual-wield should install")
}
