#[derive(Debug)]
pub struct CustomerWrite {
    pub name: String,
    pub email: String,
    pub image_url: String,
}
