pub struct Player {
    object: ObjectId,
    speed: f32,
}

impl Player {
    pub fn new(object: ObjectId) -> Self {
        Player { object, speed: 1.0 }
    }
}

impl ScriptAttribute for Player {
    fn setup(&mut self, ctx: &mut UpdateContext) {
        if let Some(object) = ctx.objects.get(self.object) {
            if let Some(AttrData::Float(speed)) = object
                .attributes
                .iter()
                .find(|attr| attr.answers_to("Player"))
                .and_then(|attr| attr.data.get("speed"))
            {
                self.speed = *speed;
            }
        }
    }

    fn update(&mut self, ctx: &mut UpdateContext) {
        if let Some(object) = ctx.objects.get_mut(self.object) {
            if let Ok(transform) = object.component_mut::<Transform>("transform") {
                transform.position.x += 0.001 * self.speed;
            }
        }
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["transform"]
    }
}
