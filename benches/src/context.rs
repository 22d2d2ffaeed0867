use rand::Rng;

#[derive(serde::Serialize)]
pub struct Context {
    pub user: String,
    pub channel: String,
    pub topic: String,
    pub ping: bool,
    pub nsfw: bool,
    pub footer: String,
}

pub fn random() -> Context {
    let mut rng = rand::thread_rng();
    let mut word = |n| (0..n).map(|_| rng.gen_range('a'..='z')).collect::<String>();
    let user = word(12);
    let channel = word(20);
    let topic = format!("\"{}\"\n{}", word(30), word(30));
    Context {
        user,
        channel,
        topic,
        ping: rng.gen_ratio(1, 2),
        nsfw: rng.gen_ratio(1, 4),
        footer: String::from("%[%ping%|%(pinged %[user]%)%]%"),
    }
}
