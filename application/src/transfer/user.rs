pub struct GetUserDto {
    pub id: String,
}

pub struct CreateUserDto {
    pub name: String,
}
