use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Collaborator {
    pub login: String,
}
