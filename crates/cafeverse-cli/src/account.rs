use cafeverse_api::SignupRequest;

use crate::storefront::Storefront;

pub(crate) async fn run_login(
    storefront: &Storefront,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    let session = storefront.client.login(username, password).await?;
    let name = session.user.display_name().to_string();
    storefront.auth.sign_in(session)?;
    println!("signed in as {name}");
    Ok(())
}

pub(crate) async fn run_signup(
    storefront: &Storefront,
    request: &SignupRequest,
) -> anyhow::Result<()> {
    let session = storefront.client.signup(request).await?;
    let name = session.user.display_name().to_string();
    storefront.auth.sign_in(session)?;
    println!("account created; signed in as {name}");
    Ok(())
}

pub(crate) fn run_logout(storefront: &Storefront) -> anyhow::Result<()> {
    storefront.auth.sign_out()?;
    println!("signed out");
    Ok(())
}
